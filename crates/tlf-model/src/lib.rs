pub mod document;
pub mod keyword;
pub mod plan;

pub use document::{
    ConfigDocument, DataSourceDef, GroupDef, GroupLabel, KeywordDef, MergedConfig, StudyBlock,
    TemplateRef,
};
pub use keyword::{Criterion, DataSource, GroupKeyword, KeywordCategory};
pub use plan::{
    AXIS_FIELDS, AnalysisSpec, AxisField, AxisValue, ExpandedAnalysis, PlanEntry, ResolvedAxis,
    ResolvedGroup, ResolvedGroupAxis, ResolvedTerm, analysis_id,
};
