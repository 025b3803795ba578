//! Error types for document loading and template resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading documents or resolving a template chain.
///
/// Resolution failures abort the whole resolution: a study cannot be
/// partially resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a document from the source.
    #[error("failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document text did not decode into a configuration document.
    #[error("failed to parse document {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A declared template parent does not exist.
    #[error("template not found: {path} (referenced by {referenced_by})")]
    TemplateNotFound {
        path: PathBuf,
        referenced_by: PathBuf,
    },

    /// A document declares itself as an ancestor, directly or transitively.
    #[error("circular template reference: {}", join_chain(.chain))]
    CircularTemplate { chain: Vec<PathBuf> },
}

impl ConfigError {
    /// True when the underlying failure is a missing file, so the resolver
    /// can attribute it to the referencing document.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

fn join_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
