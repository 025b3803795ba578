//! Study-plan facade.
//!
//! Composition point over the resolver, registry, and expander. The merged
//! configuration and registry are built once and cached for the facade's
//! lifetime; expanded analyses are recomputed on demand — they are a view
//! over the condensed plans, not authoritative state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tlf_config::DocumentSource;
use tlf_model::{AnalysisSpec, MergedConfig, StudyBlock};

use crate::error::Result;
use crate::expand::{ExpandOptions, Expansion, expand};
use crate::registry::KeywordRegistry;
use crate::resolve::resolve_analysis;

/// A resolved study: merged configuration plus its keyword registry.
///
/// Both halves are immutable after construction, so one `StudyPlan` can be
/// shared across concurrent expansions without locking.
#[derive(Debug, Clone)]
pub struct StudyPlan {
    config: MergedConfig,
    registry: KeywordRegistry,
}

impl StudyPlan {
    /// Resolves the document at `path` (and its template chain) through the
    /// given source and builds the registry.
    pub fn resolve(path: &Path, source: &impl DocumentSource) -> Result<Self> {
        let config = tlf_config::resolve(path, source)?;
        Self::from_config(config)
    }

    /// Builds a study plan from an already-merged configuration.
    pub fn from_config(config: MergedConfig) -> Result<Self> {
        let registry = KeywordRegistry::from_config(&config)?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &MergedConfig {
        &self.config
    }

    pub fn registry(&self) -> &KeywordRegistry {
        &self.registry
    }

    /// Expands all condensed plan entries under the given options.
    pub fn expand(&self, options: &ExpandOptions) -> Result<Expansion> {
        expand(&self.config, &self.registry, options)
    }

    /// Expands and fully resolves every analysis, ready for handoff to a
    /// report consumer: no unexpanded lists, no dangling references.
    pub fn analysis_specs(&self, options: &ExpandOptions) -> Result<Vec<AnalysisSpec>> {
        let expansion = self.expand(options)?;
        expansion
            .analyses
            .iter()
            .map(|analysis| resolve_analysis(analysis, &self.registry))
            .collect()
    }

    /// Summarizes the study: keyword counts, condensed vs expanded plan
    /// counts, and the resolved analyses themselves.
    pub fn summary(&self, options: &ExpandOptions) -> Result<PlanSummary> {
        let analyses = self.analysis_specs(options)?;
        Ok(PlanSummary {
            study: self.config.study.clone(),
            keyword_counts: KeywordCounts {
                populations: self.registry.populations().len(),
                observations: self.registry.observations().len(),
                parameters: self.registry.parameters().len(),
                groups: self.registry.groups().len(),
                data_sources: self.registry.data_sources().len(),
            },
            condensed_plans: self.config.plans.len(),
            individual_analyses: analyses.len(),
            analyses,
        })
    }
}

/// Keyword counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCounts {
    pub populations: usize,
    pub observations: usize,
    pub parameters: usize,
    pub groups: usize,
    pub data_sources: usize,
}

/// Serializable overview of a resolved and expanded study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub study: StudyBlock,
    pub keyword_counts: KeywordCounts,
    pub condensed_plans: usize,
    pub individual_analyses: usize,
    pub analyses: Vec<AnalysisSpec>,
}
