//! Raw and merged configuration documents.
//!
//! A [`ConfigDocument`] is the decoded form of one on-disk plan document:
//! a study identity block, keyword-category sections, and condensed plan
//! entries. Template resolution merges a chain of documents into one
//! [`MergedConfig`]; both shapes are plain value objects and are never
//! mutated after construction.

use serde::{Deserialize, Serialize};

use crate::plan::PlanEntry;

/// Study identity block, including declared template parents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyBlock {
    pub name: Option<String>,
    pub title: Option<String>,
    /// Parent document reference(s), resolved relative to the directory of
    /// the document that declares them.
    pub template: Option<TemplateRef>,
}

impl StudyBlock {
    /// Declared template parents, in declaration order.
    pub fn templates(&self) -> &[String] {
        match &self.template {
            Some(TemplateRef::One(path)) => std::slice::from_ref(path),
            Some(TemplateRef::Many(paths)) => paths,
            None => &[],
        }
    }
}

/// A single template path or a list of them; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    One(String),
    Many(Vec<String>),
}

/// Raw definition of a population, observation, or parameter keyword.
///
/// Fields are all optional apart from `name` so that a child document can
/// override a parent's definition field-by-field: only the fields actually
/// present in the child replace the parent's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDef {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub filter: Option<String>,
}

/// Raw definition of a group keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    /// Either a display string, or (legacy shape) the per-level label list.
    /// The registry normalizes the legacy shape into `group_label`.
    pub label: Option<GroupLabel>,
    pub description: Option<String>,
    pub variable: Option<String>,
    pub level: Option<Vec<String>>,
    pub group_label: Option<Vec<String>>,
}

/// Group `label` field: display text, or the legacy per-level list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupLabel {
    Text(String),
    PerLevel(Vec<String>),
}

/// Raw definition of a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceDef {
    pub name: String,
    /// Relative paths are resolved against the defining document's directory
    /// during template resolution.
    pub path: String,
}

/// One decoded configuration document, before template resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub study: StudyBlock,
    #[serde(default)]
    pub population: Vec<KeywordDef>,
    #[serde(default)]
    pub observation: Vec<KeywordDef>,
    #[serde(default)]
    pub parameter: Vec<KeywordDef>,
    #[serde(default)]
    pub group: Vec<GroupDef>,
    #[serde(default)]
    pub data: Vec<DataSourceDef>,
    #[serde(default)]
    pub plans: Vec<PlanEntry>,
}

/// The result of resolving a document's full template chain.
///
/// Same sections as [`ConfigDocument`], with keyword sections merged by name
/// (parent order preserved, child-new entries appended) and data-source paths
/// already resolved. The `template` field on `study` records the nearest
/// declaring document's parent list for provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedConfig {
    pub study: StudyBlock,
    pub population: Vec<KeywordDef>,
    pub observation: Vec<KeywordDef>,
    pub parameter: Vec<KeywordDef>,
    pub group: Vec<GroupDef>,
    pub data: Vec<DataSourceDef>,
    pub plans: Vec<PlanEntry>,
}
