pub mod error;
pub mod eval;
pub mod loader;

pub use error::{DataError, Result};
pub use eval::apply_filter;
pub use loader::{DatasetStore, load_data_source};
