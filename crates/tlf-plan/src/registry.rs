//! Keyword registry.
//!
//! Built once from a merged configuration, read-only afterwards. Storage
//! preserves insertion order (parent entries first, child-new entries
//! appended), so enumeration is deterministic across resolutions.
//!
//! The legacy group shape — a flat label list carried in the `label` field
//! instead of `group_label` — is normalized here and only here, so every
//! downstream consumer sees the canonical per-level pairing.

use tlf_model::{
    Criterion, DataSource, GroupDef, GroupKeyword, GroupLabel, KeywordCategory, KeywordDef,
    MergedConfig,
};

use crate::error::{PlanError, Result};

/// A borrowed keyword of any category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeywordRef<'a> {
    Population(&'a Criterion),
    Observation(&'a Criterion),
    Parameter(&'a Criterion),
    Group(&'a GroupKeyword),
    DataSource(&'a DataSource),
}

/// Typed collections of named keywords, one per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordRegistry {
    populations: Vec<Criterion>,
    observations: Vec<Criterion>,
    parameters: Vec<Criterion>,
    groups: Vec<GroupKeyword>,
    data_sources: Vec<DataSource>,
}

impl KeywordRegistry {
    /// Builds the registry from a merged configuration, validating keyword
    /// names and normalizing group labels.
    pub fn from_config(config: &MergedConfig) -> Result<Self> {
        let registry = Self {
            populations: criteria(&config.population, KeywordCategory::Population)?,
            observations: criteria(&config.observation, KeywordCategory::Observation)?,
            parameters: criteria(&config.parameter, KeywordCategory::Parameter)?,
            groups: config.group.iter().map(group_keyword).collect::<Result<_>>()?,
            data_sources: config
                .data
                .iter()
                .map(|source| {
                    validate_name(KeywordCategory::DataSource, &source.name)?;
                    Ok(DataSource {
                        name: source.name.clone(),
                        path: source.path.clone().into(),
                    })
                })
                .collect::<Result<_>>()?,
        };

        tracing::debug!(
            populations = registry.populations.len(),
            observations = registry.observations.len(),
            parameters = registry.parameters.len(),
            groups = registry.groups.len(),
            data_sources = registry.data_sources.len(),
            "Built keyword registry"
        );
        Ok(registry)
    }

    /// Looks up a keyword by category and name.
    pub fn get(&self, category: KeywordCategory, name: &str) -> Result<KeywordRef<'_>> {
        let found = match category {
            KeywordCategory::Population => self
                .populations
                .iter()
                .find(|k| k.name == name)
                .map(KeywordRef::Population),
            KeywordCategory::Observation => self
                .observations
                .iter()
                .find(|k| k.name == name)
                .map(KeywordRef::Observation),
            KeywordCategory::Parameter => self
                .parameters
                .iter()
                .find(|k| k.name == name)
                .map(KeywordRef::Parameter),
            KeywordCategory::Group => self
                .groups
                .iter()
                .find(|k| k.name == name)
                .map(KeywordRef::Group),
            KeywordCategory::DataSource => self
                .data_sources
                .iter()
                .find(|k| k.name == name)
                .map(KeywordRef::DataSource),
        };
        found.ok_or_else(|| PlanError::KeywordNotFound {
            category,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, category: KeywordCategory, name: &str) -> bool {
        self.get(category, name).is_ok()
    }

    /// The filter-bearing keyword behind a population/observation/parameter
    /// reference. Group and data-source lookups answer as misses here since
    /// those categories carry no filter.
    pub fn criterion(&self, category: KeywordCategory, name: &str) -> Result<&Criterion> {
        let pool = match category {
            KeywordCategory::Population => &self.populations,
            KeywordCategory::Observation => &self.observations,
            KeywordCategory::Parameter => &self.parameters,
            KeywordCategory::Group | KeywordCategory::DataSource => {
                return Err(PlanError::KeywordNotFound {
                    category,
                    name: name.to_string(),
                });
            }
        };
        pool.iter()
            .find(|k| k.name == name)
            .ok_or_else(|| PlanError::KeywordNotFound {
                category,
                name: name.to_string(),
            })
    }

    pub fn population(&self, name: &str) -> Result<&Criterion> {
        self.criterion(KeywordCategory::Population, name)
    }

    pub fn observation(&self, name: &str) -> Result<&Criterion> {
        self.criterion(KeywordCategory::Observation, name)
    }

    pub fn parameter(&self, name: &str) -> Result<&Criterion> {
        self.criterion(KeywordCategory::Parameter, name)
    }

    pub fn group(&self, name: &str) -> Result<&GroupKeyword> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| PlanError::KeywordNotFound {
                category: KeywordCategory::Group,
                name: name.to_string(),
            })
    }

    pub fn data_source(&self, name: &str) -> Result<&DataSource> {
        self.data_sources
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| PlanError::KeywordNotFound {
                category: KeywordCategory::DataSource,
                name: name.to_string(),
            })
    }

    pub fn populations(&self) -> &[Criterion] {
        &self.populations
    }

    pub fn observations(&self) -> &[Criterion] {
        &self.observations
    }

    pub fn parameters(&self) -> &[Criterion] {
        &self.parameters
    }

    pub fn groups(&self) -> &[GroupKeyword] {
        &self.groups
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }
}

fn criteria(defs: &[KeywordDef], category: KeywordCategory) -> Result<Vec<Criterion>> {
    defs.iter()
        .map(|def| {
            validate_name(category, &def.name)?;
            Ok(Criterion {
                name: def.name.clone(),
                label: def.label.clone(),
                description: def.description.clone(),
                filter: def.filter.clone().unwrap_or_default(),
            })
        })
        .collect()
}

fn group_keyword(def: &GroupDef) -> Result<GroupKeyword> {
    validate_name(KeywordCategory::Group, &def.name)?;

    let levels = def.level.clone().unwrap_or_default();

    // Canonical labels come from group_label; the legacy shape smuggles the
    // per-level list through the label field instead. Absent both, level
    // codes double as their own labels.
    let (display_label, level_labels) = match (&def.group_label, &def.label) {
        (Some(labels), Some(GroupLabel::Text(text))) => (Some(text.clone()), labels.clone()),
        (Some(labels), _) => (None, labels.clone()),
        (None, Some(GroupLabel::PerLevel(labels))) => (None, labels.clone()),
        (None, Some(GroupLabel::Text(text))) => (Some(text.clone()), levels.clone()),
        (None, None) => (None, levels.clone()),
    };

    if level_labels.len() != levels.len() {
        return Err(PlanError::GroupLabelMismatch {
            group: def.name.clone(),
            levels: levels.len(),
            labels: level_labels.len(),
        });
    }

    Ok(GroupKeyword {
        name: def.name.clone(),
        label: display_label,
        description: def.description.clone(),
        variable: def.variable.clone().unwrap_or_default(),
        levels,
        level_labels,
    })
}

fn validate_name(category: KeywordCategory, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PlanError::InvalidKeywordName {
            category,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_def(
        name: &str,
        label: Option<GroupLabel>,
        level: Option<Vec<String>>,
        group_label: Option<Vec<String>>,
    ) -> GroupDef {
        GroupDef {
            name: name.to_string(),
            label,
            description: None,
            variable: Some("adsl:trt01a".to_string()),
            level,
            group_label,
        }
    }

    fn levels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn legacy_label_list_becomes_level_labels() {
        let def = group_def(
            "trt",
            Some(GroupLabel::PerLevel(levels(&["Placebo", "Drug 10mg"]))),
            Some(levels(&["Placebo", "Xanomeline"])),
            None,
        );
        let group = group_keyword(&def).expect("normalize");
        assert_eq!(group.level_labels, levels(&["Placebo", "Drug 10mg"]));
        assert_eq!(group.label, None);
    }

    #[test]
    fn canonical_group_label_wins_over_display_label() {
        let def = group_def(
            "trt",
            Some(GroupLabel::Text("Treatment".to_string())),
            Some(levels(&["A", "B"])),
            Some(levels(&["Arm A", "Arm B"])),
        );
        let group = group_keyword(&def).expect("normalize");
        assert_eq!(group.label.as_deref(), Some("Treatment"));
        assert_eq!(group.level_labels, levels(&["Arm A", "Arm B"]));
    }

    #[test]
    fn missing_labels_fall_back_to_level_codes() {
        let def = group_def("trt", None, Some(levels(&["A", "B"])), None);
        let group = group_keyword(&def).expect("normalize");
        assert_eq!(group.level_labels, levels(&["A", "B"]));
    }

    #[test]
    fn label_length_mismatch_names_the_group() {
        let def = group_def(
            "trt",
            None,
            Some(levels(&["A", "B", "C"])),
            Some(levels(&["Arm A"])),
        );
        let err = group_keyword(&def).expect_err("should fail");
        match err {
            PlanError::GroupLabelMismatch {
                group,
                levels,
                labels,
            } => {
                assert_eq!(group, "trt");
                assert_eq!((levels, labels), (3, 1));
            }
            other => panic!("expected GroupLabelMismatch, got {other}"),
        }
    }

    #[test]
    fn uppercase_names_are_rejected() {
        let err = validate_name(KeywordCategory::Population, "Apat").expect_err("should fail");
        assert!(matches!(err, PlanError::InvalidKeywordName { .. }));
    }

    #[test]
    fn lookup_miss_names_category_and_keyword() {
        let config = MergedConfig {
            population: vec![KeywordDef {
                name: "apat".to_string(),
                label: None,
                description: None,
                filter: None,
            }],
            ..MergedConfig::default()
        };
        let registry = KeywordRegistry::from_config(&config).expect("registry");

        assert!(registry.contains(KeywordCategory::Population, "apat"));
        assert!(matches!(
            registry.get(KeywordCategory::Population, "apat"),
            Ok(KeywordRef::Population(_))
        ));

        let err = registry
            .get(KeywordCategory::Observation, "apat")
            .expect_err("wrong category should miss");
        match err {
            PlanError::KeywordNotFound { category, name } => {
                assert_eq!(category, KeywordCategory::Observation);
                assert_eq!(name, "apat");
            }
            other => panic!("expected KeywordNotFound, got {other}"),
        }
    }
}
