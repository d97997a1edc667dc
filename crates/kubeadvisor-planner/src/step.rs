//! Upgrade step types

use std::fmt;

use serde::{Deserialize, Serialize};

use kubeadvisor_analysis::ImpactLevel;

/// Kind of work a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Precheck,
    Backup,
    ApiMigration,
    ChartUpgrade,
    ClusterUpgrade,
    Validation,
}

impl StepType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precheck => "precheck",
            Self::Backup => "backup",
            Self::ApiMigration => "api_migration",
            Self::ChartUpgrade => "chart_upgrade",
            Self::ClusterUpgrade => "cluster_upgrade",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human-readable action; never executed by the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub command: String,
    pub description: String,
    pub required: bool,
}

impl Action {
    /// A required action
    pub fn required(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            required: true,
        }
    }
}

/// One node of the plan graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStep {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub impact: ImpactLevel,
    /// Ids of steps that must complete first
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Position in the linearized plan; unset until the graph is sorted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

impl UpgradeStep {
    pub fn new(
        id: impl Into<String>,
        step_type: StepType,
        impact: ImpactLevel,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            step_type,
            impact,
            dependencies: Vec::new(),
            actions: Vec::new(),
            order: None,
        }
    }

    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// `N. [type] description` line used in plan summaries (1-based)
    pub fn summary_line(&self, position: usize) -> String {
        format!("{}. [{}] {}", position, self.step_type, self.description)
    }
}
