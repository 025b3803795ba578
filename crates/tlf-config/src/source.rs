//! Document source abstraction.
//!
//! The resolver never touches the filesystem directly: it asks a
//! [`DocumentSource`] for decoded documents, so callers can serve them from
//! disk, memory, or anywhere else that supports concurrent reads.

use std::path::Path;

use tlf_model::ConfigDocument;

use crate::error::{ConfigError, Result};

/// Supplies decoded configuration documents by path.
///
/// A missing document should surface as a [`ConfigError::Read`] with an
/// [`std::io::ErrorKind::NotFound`] source, so the resolver can report it as
/// a missing template when it was reached through a `template` reference.
pub trait DocumentSource {
    fn read(&self, path: &Path) -> Result<ConfigDocument>;
}

/// Reads YAML documents from the filesystem. The default collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentSource;

impl DocumentSource for FsDocumentSource {
    fn read(&self, path: &Path) -> Result<ConfigDocument> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_reports_not_found() {
        let err = FsDocumentSource
            .read(Path::new("/nonexistent/plan.yaml"))
            .expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_yaml_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "study: [unclosed").expect("write");
        let err = FsDocumentSource.read(file.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
