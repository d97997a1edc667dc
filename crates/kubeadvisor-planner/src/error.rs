//! Error types for upgrade planning
//!
//! All of these indicate a bug in graph construction rather than bad input:
//! the plan skeleton is fixed and acyclic by construction.

use thiserror::Error;

/// Result type for planner operations
pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Topological sort could not order every step
    #[error("cycle detected in dependency graph: {} step(s) could not be ordered ({})", remaining.len(), remaining.join(", "))]
    CycleDetected { remaining: Vec<String> },

    /// A step depends on a step that does not exist
    #[error("step '{step}' depends on non-existent step '{dependency}'")]
    DanglingDependency { step: String, dependency: String },

    /// Two steps share the same id
    #[error("duplicate step id '{id}'")]
    DuplicateStep { id: String },

    /// A plan without any step
    #[error("plan has no steps")]
    EmptyPlan,
}
