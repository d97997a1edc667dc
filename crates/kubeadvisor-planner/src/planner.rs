//! Upgrade plan generation
//!
//! The plan always has the same skeleton:
//!
//! ```text
//! precheck -> backup -> migrate-api-* ----+--> cluster-upgrade -> validation
//!                  |         |            |
//!                  |         v            |
//!                  +--> upgrade-chart-* --+
//! ```
//!
//! Every chart upgrade waits for every API migration, since chart manifests
//! may themselves use the migrated APIs. The cluster upgrade waits for all
//! remediation steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kubeadvisor_analysis::{ChartImpact, DeprecatedApiImpact, ImpactAssessment, ImpactLevel};

use crate::error::{PlanError, Result};
use crate::graph::StepGraph;
use crate::step::{Action, StepType, UpgradeStep};

pub const PRECHECK_ID: &str = "precheck";
pub const BACKUP_ID: &str = "backup";
pub const CLUSTER_UPGRADE_ID: &str = "cluster-upgrade";
pub const VALIDATION_ID: &str = "validation";

/// Default duration assumed per step for the timeline estimate
pub const DEFAULT_MINUTES_PER_STEP: u64 = 30;

/// An ordered upgrade plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePlan {
    pub from_version: String,
    pub to_version: String,
    pub steps: Vec<UpgradeStep>,
    /// One `N. [type] description` line per step
    pub ordered_upgrade_steps: Vec<String>,
    pub timeline: String,
    pub total_steps: usize,
}

impl UpgradePlan {
    pub fn step(&self, id: &str) -> Option<&UpgradeStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Builds upgrade plans from impact assessments
///
/// Holds configuration only; each call constructs its own graph.
#[derive(Debug, Clone)]
pub struct Planner {
    minutes_per_step: u64,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            minutes_per_step: DEFAULT_MINUTES_PER_STEP,
        }
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minutes_per_step(mut self, minutes: u64) -> Self {
        self.minutes_per_step = minutes;
        self
    }

    /// Generate an ordered plan for an assessment
    pub fn generate_plan(&self, assessment: &ImpactAssessment) -> Result<UpgradePlan> {
        let graph = build_graph(assessment)?;
        let node_count = graph.len();
        let steps = graph.linearize()?;

        tracing::debug!(steps = node_count, "linearized upgrade graph");

        let ordered_upgrade_steps = steps
            .iter()
            .enumerate()
            .map(|(i, step)| step.summary_line(i + 1))
            .collect();

        Ok(UpgradePlan {
            from_version: assessment.current_version.clone(),
            to_version: assessment.target_version.clone(),
            total_steps: steps.len(),
            timeline: estimate_timeline(steps.len(), self.minutes_per_step),
            ordered_upgrade_steps,
            steps,
        })
    }

    /// Check that a plan is non-empty and every dependency points at a step in it
    pub fn validate_plan(&self, plan: &UpgradePlan) -> Result<()> {
        if plan.steps.is_empty() {
            return Err(PlanError::EmptyPlan);
        }

        for step in &plan.steps {
            for dependency in &step.dependencies {
                if plan.step(dependency).is_none() {
                    return Err(PlanError::DanglingDependency {
                        step: step.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Build the step graph for an assessment
fn build_graph(assessment: &ImpactAssessment) -> Result<StepGraph> {
    let mut graph = StepGraph::new();

    graph.add_step(precheck_step())?;
    graph.add_step(backup_step())?;

    let migrations = api_migration_steps(&assessment.deprecated_manifest_apis);
    let migration_ids: Vec<String> = migrations.iter().map(|s| s.id.clone()).collect();
    for step in migrations {
        graph.add_step(step)?;
    }

    let charts = chart_upgrade_steps(&assessment.incompatible_charts);
    let chart_ids: Vec<String> = charts.iter().map(|s| s.id.clone()).collect();
    for mut step in charts {
        step.dependencies.extend(migration_ids.iter().cloned());
        graph.add_step(step)?;
    }

    let mut cluster_upgrade = cluster_upgrade_step(assessment);
    cluster_upgrade.dependencies.extend(migration_ids);
    cluster_upgrade.dependencies.extend(chart_ids);
    graph.add_step(cluster_upgrade)?;

    graph.add_step(validation_step())?;

    Ok(graph)
}

fn precheck_step() -> UpgradeStep {
    UpgradeStep::new(
        PRECHECK_ID,
        StepType::Precheck,
        ImpactLevel::Low,
        "Pre-upgrade validation and checks",
    )
    .with_action(Action::required("kubectl version", "Verify cluster connectivity"))
    .with_action(Action::required("kubectl get nodes", "Check node status"))
}

fn backup_step() -> UpgradeStep {
    UpgradeStep::new(
        BACKUP_ID,
        StepType::Backup,
        ImpactLevel::High,
        "Backup cluster state and critical resources",
    )
    .depends_on(PRECHECK_ID)
    .with_action(Action::required(
        "velero backup create pre-upgrade-backup --wait",
        "Create full cluster backup",
    ))
    .with_action(Action::required(
        "etcdctl snapshot save /backup/etcd-snapshot.db",
        "Backup etcd",
    ))
}

/// One migration step per distinct step id
///
/// GVKs that sanitize to the same id share a step; the first one seen
/// describes it.
fn api_migration_steps(apis: &[DeprecatedApiImpact]) -> Vec<UpgradeStep> {
    let mut by_id: BTreeMap<String, &DeprecatedApiImpact> = BTreeMap::new();
    for api in apis {
        by_id
            .entry(format!("migrate-api-{}", sanitize_id(&api.gvk_key())))
            .or_insert(api);
    }

    by_id
        .into_iter()
        .map(|(id, api)| {
            let kind_lower = api.kind.to_lowercase();
            UpgradeStep::new(
                id,
                StepType::ApiMigration,
                api.impact_level,
                format!(
                    "Migrate {} {} to {}",
                    api.group_version(),
                    api.kind,
                    api.replacement_api
                ),
            )
            .depends_on(BACKUP_ID)
            .with_action(Action::required(
                format!(
                    "kubectl get {} -o yaml > backup-{}.yaml",
                    api.kind, kind_lower
                ),
                format!("Backup existing {} resources", api.kind),
            ))
            .with_action(Action::required(
                format!(
                    "kubectl convert -f backup-{}.yaml --output-version={}",
                    kind_lower, api.replacement_api
                ),
                format!("Convert to {}", api.replacement_api),
            ))
            .with_action(Action::required(
                "Manual review required",
                api.migration_notes.clone(),
            ))
        })
        .collect()
}

/// One upgrade step per distinct chart; releases of the same chart share it
fn chart_upgrade_steps(charts: &[ChartImpact]) -> Vec<UpgradeStep> {
    let mut by_id: BTreeMap<String, Vec<&ChartImpact>> = BTreeMap::new();
    for chart in charts {
        by_id
            .entry(format!("upgrade-chart-{}", sanitize_id(&chart.chart_name)))
            .or_default()
            .push(chart);
    }

    by_id
        .into_iter()
        .filter_map(|(id, releases)| {
            let first = *releases.first()?;
            let impact = releases
                .iter()
                .map(|r| r.impact_level)
                .max()
                .unwrap_or(ImpactLevel::High);
            let target = first
                .recommended_version
                .as_deref()
                .unwrap_or("a compatible version");

            let mut step = UpgradeStep::new(
                id,
                StepType::ChartUpgrade,
                impact,
                format!(
                    "Upgrade {} from {} to {}",
                    first.chart_name, first.current_version, target
                ),
            )
            .depends_on(BACKUP_ID);

            let mut issues: Vec<&str> = Vec::new();
            for release in &releases {
                let action = match &release.recommended_version {
                    Some(version) => Action::required(
                        format!(
                            "helm upgrade {} {} --version {} -n {}",
                            release.release_name, release.chart_name, version, release.namespace
                        ),
                        format!("Upgrade to version {}", version),
                    ),
                    None => Action::required(
                        "Manual intervention required",
                        release.message.clone(),
                    ),
                };
                step.actions.push(action);
                for issue in &release.issues {
                    if !issues.contains(&issue.as_str()) {
                        issues.push(issue);
                    }
                }
            }

            if !issues.is_empty() {
                step.actions
                    .push(Action::required("Review known issues", issues.join("; ")));
            }

            Some(step)
        })
        .collect()
}

fn cluster_upgrade_step(assessment: &ImpactAssessment) -> UpgradeStep {
    UpgradeStep::new(
        CLUSTER_UPGRADE_ID,
        StepType::ClusterUpgrade,
        ImpactLevel::Critical,
        format!(
            "Upgrade Kubernetes from {} to {}",
            assessment.current_version, assessment.target_version
        ),
    )
    .depends_on(BACKUP_ID)
    .with_action(Action::required("kubeadm upgrade plan", "Review upgrade plan"))
    .with_action(Action::required(
        format!("kubeadm upgrade apply {}", assessment.target_version),
        "Apply Kubernetes upgrade",
    ))
    .with_action(Action::required(
        "kubectl drain <node> --ignore-daemonsets",
        "Drain nodes before upgrade",
    ))
    .with_action(Action::required(
        "kubectl uncordon <node>",
        "Uncordon nodes after upgrade",
    ))
}

fn validation_step() -> UpgradeStep {
    UpgradeStep::new(
        VALIDATION_ID,
        StepType::Validation,
        ImpactLevel::Medium,
        "Post-upgrade validation",
    )
    .depends_on(CLUSTER_UPGRADE_ID)
    .with_action(Action::required("kubectl get nodes", "Verify all nodes are ready"))
    .with_action(Action::required(
        "kubectl get pods --all-namespaces",
        "Check all pods are running",
    ))
    .with_action(Action::required("kubectl api-resources", "Verify API resources"))
}

/// Coarse duration estimate, rounded down to whole hours
pub fn estimate_timeline(step_count: usize, minutes_per_step: u64) -> String {
    let hours = (step_count as u64 * minutes_per_step) / 60;
    match hours {
        0 => "less than 1 hour".to_string(),
        1 => "approximately 1 hour".to_string(),
        n => format!("approximately {} hours", n),
    }
}

/// Lower-case and replace `/`, `.` and spaces with `-`
pub fn sanitize_id(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '.' | ' ' => '-',
            other => other,
        })
        .collect()
}
