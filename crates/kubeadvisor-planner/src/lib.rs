//! kubeadvisor Planner - Ordered remediation plans
//!
//! Turns an [`ImpactAssessment`](kubeadvisor_analysis::ImpactAssessment) into
//! an [`UpgradePlan`]: a fixed skeleton of steps (pre-check, backup, API
//! migrations, chart upgrades, cluster upgrade, validation) linked by
//! dependency edges and linearized with a deterministic topological sort.
//!
//! Planning is a pure computation. Every call builds its own graph, so a
//! single [`Planner`] can be shared freely between threads.

pub mod error;
pub mod graph;
pub mod planner;
pub mod response;
pub mod step;

pub use error::{PlanError, Result};
pub use graph::StepGraph;
pub use planner::{Planner, UpgradePlan, estimate_timeline, sanitize_id};
pub use response::AssessmentWithPlan;
pub use step::{Action, StepType, UpgradeStep};
