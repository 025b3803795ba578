pub mod error;
pub mod expand;
pub mod registry;
pub mod resolve;
pub mod study;

pub use error::{PlanError, Result};
pub use expand::{EmptyAxisPolicy, EntryFailure, ExpandOptions, Expansion, expand};
pub use registry::{KeywordRef, KeywordRegistry};
pub use resolve::resolve_analysis;
pub use study::{KeywordCounts, PlanSummary, StudyPlan};
