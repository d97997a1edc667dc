//! kubeadvisor Analysis - Upgrade impact assessment
//!
//! Cross-references a cluster inventory against the API deprecation and chart
//! compatibility knowledge bases and classifies the risk of moving the control
//! plane to a target version.
//!
//! The resulting [`ImpactAssessment`] is the data contract consumed by the
//! upgrade planner and by report rendering.

pub mod error;
pub mod impact;
pub mod report;

pub use error::{AnalysisError, Result};
pub use impact::{Analyzer, ChartImpact, DeprecatedApiImpact, ImpactAssessment, ImpactLevel};
pub use report::render_report;
