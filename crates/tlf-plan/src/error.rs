//! Error types for registry construction and plan expansion.

use thiserror::Error;

use tlf_config::ConfigError;
use tlf_filter::FilterError;
use tlf_model::KeywordCategory;

/// Errors raised while building a keyword registry or expanding plans.
#[derive(Debug, Error)]
pub enum PlanError {
    /// `(category, name)` lookup miss. Never answered with a placeholder.
    #[error("{category} keyword not found: {name}")]
    KeywordNotFound {
        category: KeywordCategory,
        name: String,
    },

    /// Group `level` and `group_label` sequences differ in length.
    #[error("group {group}: {levels} level(s) but {labels} label(s)")]
    GroupLabelMismatch {
        group: String,
        levels: usize,
        labels: usize,
    },

    /// Keyword names are lowercase alphanumeric/underscore.
    #[error("invalid {category} keyword name {name:?}")]
    InvalidKeywordName {
        category: KeywordCategory,
        name: String,
    },

    /// A condensed plan entry failed to expand; carries the entry index and
    /// analysis identifier so the offending row is locatable.
    #[error("plan entry {index} ({analysis}): {source}")]
    EntryExpansion {
        index: usize,
        analysis: String,
        #[source]
        source: Box<PlanError>,
    },

    /// A keyword's filter string failed to parse.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Template resolution failed underneath the facade.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for plan operations.
pub type Result<T> = std::result::Result<T, PlanError>;
