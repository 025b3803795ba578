//! Template-inheritance resolution.
//!
//! A document may declare one or more `template` parents. Resolution loads
//! the full parent chain depth-first — organization templates before
//! therapeutic-area templates before the study's own sections — and merges
//! each layer over the previous one with field-level override semantics.
//! Template references and data-source paths both resolve relative to the
//! directory of the document that declares them.

use std::path::{Component, Path, PathBuf};

use tlf_model::{ConfigDocument, DataSourceDef, MergedConfig};

use crate::error::{ConfigError, Result};
use crate::merge::merge_configs;
use crate::source::DocumentSource;

/// Resolves the document at `path` and its full template chain into one
/// merged configuration. Inputs are not mutated; the result is a fresh
/// value safe to share across threads.
pub fn resolve(path: &Path, source: &impl DocumentSource) -> Result<MergedConfig> {
    let mut stack = Vec::new();
    resolve_chain(path, source, &mut stack)
}

fn resolve_chain(
    path: &Path,
    source: &impl DocumentSource,
    stack: &mut Vec<PathBuf>,
) -> Result<MergedConfig> {
    let normalized = normalize_path(path);
    if stack.contains(&normalized) {
        let mut chain = stack.clone();
        chain.push(normalized);
        return Err(ConfigError::CircularTemplate { chain });
    }

    let document = source.read(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let templates = document.study.templates().to_vec();

    tracing::debug!(
        path = %path.display(),
        templates = templates.len(),
        "Loaded plan document"
    );

    stack.push(normalized);
    let mut merged = MergedConfig::default();
    for template in &templates {
        let parent_path = base_dir.join(template);
        let parent = match resolve_chain(&parent_path, source, stack) {
            Ok(parent) => parent,
            Err(err) if err.is_not_found() => {
                return Err(ConfigError::TemplateNotFound {
                    path: parent_path,
                    referenced_by: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err),
        };
        merged = merge_configs(merged, parent);
    }
    stack.pop();

    Ok(merge_configs(merged, own_layer(document, &base_dir)))
}

/// Converts a decoded document into its own merge layer, resolving
/// data-source paths against the document's directory so they stay valid
/// regardless of which study ultimately includes them.
fn own_layer(document: ConfigDocument, base_dir: &Path) -> MergedConfig {
    let data = document
        .data
        .into_iter()
        .map(|source| resolve_data_path(source, base_dir))
        .collect();

    MergedConfig {
        study: document.study,
        population: document.population,
        observation: document.observation,
        parameter: document.parameter,
        group: document.group,
        data,
        plans: document.plans,
    }
}

fn resolve_data_path(source: DataSourceDef, base_dir: &Path) -> DataSourceDef {
    let path = Path::new(&source.path);
    if path.is_absolute() {
        return source;
    }
    DataSourceDef {
        name: source.name,
        path: normalize_path(&base_dir.join(path))
            .to_string_lossy()
            .into_owned(),
    }
}

/// Lexical path normalization, enough for cycle detection without touching
/// the filesystem (`a/b/../c` and `a/c` are the same document).
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
