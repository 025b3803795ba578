//! Field-level configuration merging.
//!
//! Merging is keyword-level, not document-level: keyword sections merge by
//! `name`, and within a matching name every field present in the overlay
//! replaces the base field while absent overlay fields keep the base value.
//! Base order is preserved; overlay-new entries are appended.

use tlf_model::{DataSourceDef, GroupDef, KeywordDef, MergedConfig, StudyBlock};

/// Merges `overlay` on top of `base`, overlay winning field-by-field.
pub fn merge_configs(base: MergedConfig, overlay: MergedConfig) -> MergedConfig {
    MergedConfig {
        study: merge_study(base.study, overlay.study),
        population: merge_keywords(base.population, overlay.population),
        observation: merge_keywords(base.observation, overlay.observation),
        parameter: merge_keywords(base.parameter, overlay.parameter),
        group: merge_groups(base.group, overlay.group),
        data: merge_data(base.data, overlay.data),
        // Plans are not a named collection; a document with its own plans
        // replaces whatever it inherited.
        plans: if overlay.plans.is_empty() {
            base.plans
        } else {
            overlay.plans
        },
    }
}

fn merge_study(base: StudyBlock, overlay: StudyBlock) -> StudyBlock {
    StudyBlock {
        name: overlay.name.or(base.name),
        title: overlay.title.or(base.title),
        template: overlay.template.or(base.template),
    }
}

fn merge_keywords(base: Vec<KeywordDef>, overlay: Vec<KeywordDef>) -> Vec<KeywordDef> {
    let mut merged = base;
    for keyword in overlay {
        match merged.iter_mut().find(|k| k.name == keyword.name) {
            Some(existing) => {
                existing.label = keyword.label.or(existing.label.take());
                existing.description = keyword.description.or(existing.description.take());
                existing.filter = keyword.filter.or(existing.filter.take());
            }
            None => merged.push(keyword),
        }
    }
    merged
}

fn merge_groups(base: Vec<GroupDef>, overlay: Vec<GroupDef>) -> Vec<GroupDef> {
    let mut merged = base;
    for group in overlay {
        match merged.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => {
                existing.label = group.label.or(existing.label.take());
                existing.description = group.description.or(existing.description.take());
                existing.variable = group.variable.or(existing.variable.take());
                existing.level = group.level.or(existing.level.take());
                existing.group_label = group.group_label.or(existing.group_label.take());
            }
            None => merged.push(group),
        }
    }
    merged
}

fn merge_data(base: Vec<DataSourceDef>, overlay: Vec<DataSourceDef>) -> Vec<DataSourceDef> {
    let mut merged = base;
    for source in overlay {
        match merged.iter_mut().find(|d| d.name == source.name) {
            Some(existing) => existing.path = source.path,
            None => merged.push(source),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(name: &str, label: Option<&str>, filter: Option<&str>) -> KeywordDef {
        KeywordDef {
            name: name.to_string(),
            label: label.map(String::from),
            description: None,
            filter: filter.map(String::from),
        }
    }

    #[test]
    fn overlay_fields_win_but_absent_fields_survive() {
        let base = vec![keyword("apat", Some("All Participants as Treated"), None)];
        let overlay = vec![keyword("apat", None, Some("adsl:saffl == 'Y'"))];

        let merged = merge_keywords(base, overlay);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label.as_deref(), Some("All Participants as Treated"));
        assert_eq!(merged[0].filter.as_deref(), Some("adsl:saffl == 'Y'"));
    }

    #[test]
    fn overlay_new_keywords_append_after_base_order() {
        let base = vec![keyword("apat", None, None), keyword("saf", None, None)];
        let overlay = vec![keyword("itt", None, None), keyword("saf", Some("Safety"), None)];

        let merged = merge_keywords(base, overlay);
        let names: Vec<&str> = merged.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["apat", "saf", "itt"]);
        assert_eq!(merged[1].label.as_deref(), Some("Safety"));
    }

    #[test]
    fn keywords_present_in_only_one_layer_pass_through() {
        let base = vec![keyword("apat", Some("base"), Some("adsl:saffl == 'Y'"))];
        let merged = merge_keywords(base.clone(), Vec::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn plans_replace_rather_than_merge() {
        use tlf_model::{AxisValue, PlanEntry};

        let entry = |analysis: &str| PlanEntry {
            analysis: analysis.to_string(),
            population: Some(AxisValue::Scalar("apat".to_string())),
            observation: None,
            group: None,
            parameter: None,
        };

        let base = MergedConfig {
            plans: vec![entry("ae_summary"), entry("disposition")],
            ..MergedConfig::default()
        };
        let overlay = MergedConfig {
            plans: vec![entry("ae_listing")],
            ..MergedConfig::default()
        };
        let merged = merge_configs(base.clone(), overlay);
        assert_eq!(merged.plans.len(), 1);
        assert_eq!(merged.plans[0].analysis, "ae_listing");

        // A child with no plans of its own inherits the parent's.
        let merged = merge_configs(base, MergedConfig::default());
        assert_eq!(merged.plans.len(), 2);
    }

    #[test]
    fn data_source_path_is_replaced_whole() {
        let base = vec![DataSourceDef {
            name: "adsl".to_string(),
            path: "/org/data/adsl.csv".to_string(),
        }];
        let overlay = vec![DataSourceDef {
            name: "adsl".to_string(),
            path: "/study/data/adsl.csv".to_string(),
        }];
        let merged = merge_data(base, overlay);
        assert_eq!(merged[0].path, "/study/data/adsl.csv");
    }
}
