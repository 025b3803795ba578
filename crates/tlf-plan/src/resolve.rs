//! Resolution of expanded analyses into consumer-ready specifications.
//!
//! An [`ExpandedAnalysis`] still refers to keywords by name; this step looks
//! every reference up and attaches labels, filters, and group level tables,
//! so downstream consumers never touch the registry. Semicolon composites
//! resolve to one term per constituent while the combined value string is
//! kept verbatim.

use tlf_model::{
    AnalysisSpec, AxisField, ExpandedAnalysis, KeywordCategory, ResolvedAxis, ResolvedGroup,
    ResolvedGroupAxis, ResolvedTerm,
};

use crate::error::Result;
use crate::registry::KeywordRegistry;

/// Resolves one expanded analysis against the registry.
pub fn resolve_analysis(
    analysis: &ExpandedAnalysis,
    registry: &KeywordRegistry,
) -> Result<AnalysisSpec> {
    let population = analysis
        .axis(AxisField::Population)
        .map(|value| resolve_axis(value, KeywordCategory::Population, registry))
        .transpose()?;
    let observation = analysis
        .axis(AxisField::Observation)
        .map(|value| resolve_axis(value, KeywordCategory::Observation, registry))
        .transpose()?;
    let parameter = analysis
        .axis(AxisField::Parameter)
        .map(|value| resolve_axis(value, KeywordCategory::Parameter, registry))
        .transpose()?;
    let group = analysis
        .axis(AxisField::Group)
        .map(|value| resolve_group_axis(value, registry))
        .transpose()?;

    let title = build_title(
        &analysis.analysis,
        population.as_ref(),
        observation.as_ref(),
        parameter.as_ref(),
    );

    Ok(AnalysisSpec {
        id: analysis.id.clone(),
        analysis: analysis.analysis.clone(),
        title,
        population,
        observation,
        group,
        parameter,
    })
}

fn resolve_axis(
    value: &str,
    category: KeywordCategory,
    registry: &KeywordRegistry,
) -> Result<ResolvedAxis> {
    let terms = value
        .split(';')
        .map(str::trim)
        .map(|name| {
            let criterion = registry.criterion(category, name)?;
            Ok(ResolvedTerm {
                keyword: criterion.name.clone(),
                label: criterion.label.clone(),
                filter: criterion.filter.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ResolvedAxis {
        value: value.to_string(),
        terms,
    })
}

fn resolve_group_axis(value: &str, registry: &KeywordRegistry) -> Result<ResolvedGroupAxis> {
    let groups = value
        .split(';')
        .map(str::trim)
        .map(|name| {
            let group = registry.group(name)?;
            Ok(ResolvedGroup {
                keyword: group.name.clone(),
                variable: group.variable.clone(),
                levels: group.levels.clone(),
                labels: group.level_labels.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ResolvedGroupAxis {
        value: value.to_string(),
        groups,
    })
}

/// Generates the display title: the analysis identifier with underscores
/// opened up and each word capitalized, followed by a `- label` segment per
/// labelled axis.
fn build_title(
    analysis: &str,
    population: Option<&ResolvedAxis>,
    observation: Option<&ResolvedAxis>,
    parameter: Option<&ResolvedAxis>,
) -> String {
    let mut title = title_case(analysis);
    for axis in [population, observation, parameter].into_iter().flatten() {
        if let Some(label) = axis_label(axis) {
            title.push_str(" - ");
            title.push_str(&label);
        }
    }
    title
}

/// Joint label for an axis: constituent labels (falling back to keyword
/// names) joined with `/`. None when no constituent carries a label.
fn axis_label(axis: &ResolvedAxis) -> Option<String> {
    if axis.terms.iter().all(|term| term.label.is_none()) {
        return None;
    }
    let joined = axis
        .terms
        .iter()
        .map(|term| term.label.as_deref().unwrap_or(&term.keyword))
        .collect::<Vec<_>>()
        .join("/");
    Some(joined)
}

fn title_case(analysis: &str) -> String {
    analysis
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
