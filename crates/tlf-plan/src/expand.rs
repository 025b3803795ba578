//! Condensed-plan expansion.
//!
//! Each condensed entry expands into the Cartesian product of its
//! list-valued axis fields. Scalar and semicolon-composite values contribute
//! a single factor: a composite like `"any;rel;ser"` is one combined token
//! carried through unsplit, never an expansion operator. The product is
//! enumerated with the first-declared axis varying slowest, matching nested
//! iteration in field-declaration order.

use tlf_model::{
    AXIS_FIELDS, AxisField, ExpandedAnalysis, KeywordCategory, MergedConfig, PlanEntry,
    analysis_id,
};

use crate::error::{PlanError, Result};
use crate::registry::KeywordRegistry;

/// What to do with an axis field given as an empty list.
///
/// Either way the entry contributes zero analyses; `Warn` surfaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyAxisPolicy {
    #[default]
    Skip,
    Warn,
}

/// Expansion policy knobs.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Abort the whole expansion on the first failing entry. When false, a
    /// failing entry is dropped whole and recorded in
    /// [`Expansion::failures`] while other entries still expand.
    pub strict: bool,
    pub empty_axis: EmptyAxisPolicy,
    /// Also parse the filter strings of every referenced
    /// population/observation/parameter keyword.
    pub validate_filters: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            strict: true,
            empty_axis: EmptyAxisPolicy::default(),
            validate_filters: false,
        }
    }
}

impl ExpandOptions {
    /// Keep going after a failing entry, collecting its error instead.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}

/// A condensed entry that failed to expand under the lenient policy.
#[derive(Debug)]
pub struct EntryFailure {
    pub index: usize,
    pub analysis: String,
    pub error: PlanError,
}

/// The outcome of expanding a configuration's plans.
#[derive(Debug, Default)]
pub struct Expansion {
    pub analyses: Vec<ExpandedAnalysis>,
    /// Populated only under the lenient policy.
    pub failures: Vec<EntryFailure>,
}

/// Expands every condensed plan entry in document order.
pub fn expand(
    config: &MergedConfig,
    registry: &KeywordRegistry,
    options: &ExpandOptions,
) -> Result<Expansion> {
    let mut expansion = Expansion::default();

    for (index, entry) in config.plans.iter().enumerate() {
        match expand_entry(entry, registry, options) {
            Ok(analyses) => expansion.analyses.extend(analyses),
            Err(source) => {
                let error = PlanError::EntryExpansion {
                    index,
                    analysis: entry.analysis.clone(),
                    source: Box::new(source),
                };
                if options.strict {
                    return Err(error);
                }
                tracing::warn!(index, analysis = %entry.analysis, %error, "Skipping plan entry");
                expansion.failures.push(EntryFailure {
                    index,
                    analysis: entry.analysis.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        condensed = config.plans.len(),
        expanded = expansion.analyses.len(),
        skipped = expansion.failures.len(),
        "Expanded analysis plans"
    );
    Ok(expansion)
}

fn expand_entry(
    entry: &PlanEntry,
    registry: &KeywordRegistry,
    options: &ExpandOptions,
) -> Result<Vec<ExpandedAnalysis>> {
    // Present axes in declaration order; absent fields stay absent in every
    // emitted analysis rather than defaulting to a wildcard.
    let axes: Vec<(AxisField, &[String])> = AXIS_FIELDS
        .iter()
        .filter_map(|&field| entry.axis(field).map(|value| (field, value.factors())))
        .collect();

    if let Some((field, _)) = axes.iter().find(|(_, factors)| factors.is_empty()) {
        match options.empty_axis {
            EmptyAxisPolicy::Skip => {}
            EmptyAxisPolicy::Warn => tracing::warn!(
                analysis = %entry.analysis,
                axis = field.as_str(),
                "Plan entry has an empty axis list and expands to nothing"
            ),
        }
        return Ok(Vec::new());
    }

    let total: usize = axes.iter().map(|(_, factors)| factors.len()).product();
    let mut analyses = Vec::with_capacity(total);
    let mut indices = vec![0usize; axes.len()];

    for _ in 0..total {
        let mut analysis = ExpandedAnalysis {
            id: String::new(),
            analysis: entry.analysis.clone(),
            population: None,
            observation: None,
            group: None,
            parameter: None,
        };
        for (slot, &(field, factors)) in axes.iter().enumerate() {
            let value = Some(factors[indices[slot]].clone());
            match field {
                AxisField::Population => analysis.population = value,
                AxisField::Observation => analysis.observation = value,
                AxisField::Group => analysis.group = value,
                AxisField::Parameter => analysis.parameter = value,
            }
        }
        analysis.id = analysis_id(
            &analysis.analysis,
            analysis.population.as_deref(),
            analysis.observation.as_deref(),
            analysis.parameter.as_deref(),
        );
        analyses.push(analysis);

        // Odometer step: last-declared axis varies fastest.
        for slot in (0..axes.len()).rev() {
            indices[slot] += 1;
            if indices[slot] < axes[slot].1.len() {
                break;
            }
            indices[slot] = 0;
        }
    }

    for analysis in &analyses {
        validate_analysis(analysis, registry, options)?;
    }

    Ok(analyses)
}

/// Checks that every constituent keyword name (splitting semicolon
/// composites) resolves in the registry under the axis's category.
fn validate_analysis(
    analysis: &ExpandedAnalysis,
    registry: &KeywordRegistry,
    options: &ExpandOptions,
) -> Result<()> {
    for field in AXIS_FIELDS {
        let Some(value) = analysis.axis(field) else {
            continue;
        };
        let category = field.category();
        for name in value.split(';').map(str::trim) {
            if !registry.contains(category, name) {
                return Err(PlanError::KeywordNotFound {
                    category,
                    name: name.to_string(),
                });
            }
            if options.validate_filters && category != KeywordCategory::Group {
                let criterion = registry.criterion(category, name)?;
                tlf_filter::parse(&criterion.filter)?;
            }
        }
    }
    Ok(())
}
