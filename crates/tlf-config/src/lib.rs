pub mod error;
pub mod merge;
pub mod resolver;
pub mod source;

pub use error::{ConfigError, Result};
pub use merge::merge_configs;
pub use resolver::resolve;
pub use source::{DocumentSource, FsDocumentSource};
