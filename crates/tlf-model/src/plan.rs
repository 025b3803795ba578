//! Condensed plan entries and their expanded forms.
//!
//! A condensed entry packs several analyses into one row: each axis field
//! (population, observation, group, parameter) may hold a single keyword
//! name, a semicolon-joined composite, or a list. Lists expand into separate
//! analyses; a composite is one combined token and is never split during
//! expansion — the semicolon is an internal convention consumed downstream.

use serde::{Deserialize, Serialize};

use crate::keyword::KeywordCategory;

/// The value of one axis field on a condensed plan entry.
///
/// The three cases drive the Cartesian expansion rule: `Scalar` and
/// `Composite` contribute exactly one factor, `List` contributes one factor
/// per element (zero elements means the entry expands to nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Scalar(String),
    Composite(String),
    List(Vec<String>),
}

impl AxisValue {
    /// Classifies a plain string: a `;` anywhere makes it a composite.
    pub fn classify(value: String) -> Self {
        if value.contains(';') {
            Self::Composite(value)
        } else {
            Self::Scalar(value)
        }
    }

    /// The Cartesian factors this value contributes, in declaration order.
    pub fn factors(&self) -> &[String] {
        match self {
            Self::Scalar(value) | Self::Composite(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

impl<'de> Deserialize<'de> for AxisValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Items(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(value) => Self::classify(value),
            Raw::Items(values) => Self::List(values),
        })
    }
}

/// The axis fields of a plan entry, in declaration order.
///
/// Expansion enumerates the product with the first field varying slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisField {
    Population,
    Observation,
    Group,
    Parameter,
}

/// All axis fields, in declaration order.
pub const AXIS_FIELDS: [AxisField; 4] = [
    AxisField::Population,
    AxisField::Observation,
    AxisField::Group,
    AxisField::Parameter,
];

impl AxisField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Observation => "observation",
            Self::Group => "group",
            Self::Parameter => "parameter",
        }
    }

    /// The keyword category this axis resolves against.
    pub fn category(self) -> KeywordCategory {
        match self {
            Self::Population => KeywordCategory::Population,
            Self::Observation => KeywordCategory::Observation,
            Self::Group => KeywordCategory::Group,
            Self::Parameter => KeywordCategory::Parameter,
        }
    }
}

/// One condensed plan entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Analysis function identifier; carried through unresolved.
    pub analysis: String,
    pub population: Option<AxisValue>,
    pub observation: Option<AxisValue>,
    pub group: Option<AxisValue>,
    pub parameter: Option<AxisValue>,
}

impl PlanEntry {
    pub fn axis(&self, field: AxisField) -> Option<&AxisValue> {
        match field {
            AxisField::Population => self.population.as_ref(),
            AxisField::Observation => self.observation.as_ref(),
            AxisField::Group => self.group.as_ref(),
            AxisField::Parameter => self.parameter.as_ref(),
        }
    }
}

/// One fully expanded analysis: exactly one concrete value per axis field
/// that was present on the condensed entry. A value is either a plain
/// keyword name or a semicolon-joined composite, never a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedAnalysis {
    pub id: String,
    pub analysis: String,
    pub population: Option<String>,
    pub observation: Option<String>,
    pub group: Option<String>,
    pub parameter: Option<String>,
}

impl ExpandedAnalysis {
    pub fn axis(&self, field: AxisField) -> Option<&str> {
        match field {
            AxisField::Population => self.population.as_deref(),
            AxisField::Observation => self.observation.as_deref(),
            AxisField::Group => self.group.as_deref(),
            AxisField::Parameter => self.parameter.as_deref(),
        }
    }
}

/// Builds the analysis id: analysis, population, observation, and parameter
/// joined by `_`, skipping absent axes. Composites keep their semicolons.
pub fn analysis_id(
    analysis: &str,
    population: Option<&str>,
    observation: Option<&str>,
    parameter: Option<&str>,
) -> String {
    let mut parts = vec![analysis];
    parts.extend(population);
    parts.extend(observation);
    parts.extend(parameter);
    parts.join("_")
}

/// A keyword reference resolved to its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTerm {
    pub keyword: String,
    pub label: Option<String>,
    pub filter: String,
}

/// One resolved axis value: the emitted string plus one resolved term per
/// semicolon constituent (a single term for plain names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAxis {
    pub value: String,
    pub terms: Vec<ResolvedTerm>,
}

/// A group reference resolved to its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGroup {
    pub keyword: String,
    pub variable: String,
    pub levels: Vec<String>,
    pub labels: Vec<String>,
}

/// One resolved group axis value: the emitted string plus one resolved
/// group per semicolon constituent (normally exactly one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGroupAxis {
    pub value: String,
    pub groups: Vec<ResolvedGroup>,
}

/// A fully resolved analysis specification, ready for a downstream consumer:
/// no unexpanded lists, no dangling keyword references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSpec {
    pub id: String,
    pub analysis: String,
    pub title: String,
    pub population: Option<ResolvedAxis>,
    pub observation: Option<ResolvedAxis>,
    pub group: Option<ResolvedGroupAxis>,
    pub parameter: Option<ResolvedAxis>,
}
