//! Resolved keyword types.
//!
//! Keywords are named, reusable definitions referenced from analysis plans:
//! populations, observations, parameters, treatment groups, and data sources.
//! Instances are built once by the registry and are read-only afterwards.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The closed set of keyword categories.
///
/// Lookups are always by `(category, name)`; a name is unique within its
/// category but may repeat across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Population,
    Observation,
    Parameter,
    Group,
    DataSource,
}

impl KeywordCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Observation => "observation",
            Self::Parameter => "parameter",
            Self::Group => "group",
            Self::DataSource => "data_source",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter-bearing keyword: population, observation, or parameter.
///
/// The three categories share one shape; the registry keeps them in separate
/// collections so `(category, name)` lookups stay unambiguous. An empty
/// `filter` means "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub filter: String,
}

/// A treatment-group keyword.
///
/// `levels` and `level_labels` have the same length after registry
/// normalization; `variable` is a `dataset:column` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupKeyword {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub variable: String,
    pub levels: Vec<String>,
    pub level_labels: Vec<String>,
}

/// A named data source with its on-disk location.
///
/// The path has already been resolved against the directory of the document
/// that defined it, so organization-level sources stay valid from any study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(KeywordCategory::Population.to_string(), "population");
        assert_eq!(KeywordCategory::DataSource.to_string(), "data_source");
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&KeywordCategory::DataSource).expect("serialize");
        assert_eq!(json, "\"data_source\"");
    }
}
