//! Helm chart compatibility knowledge base

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::read_json;
use crate::error::Result;
use crate::version::{compare_chart_versions, same_minor_version};

/// Compatibility of one chart release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCompatibility {
    pub chart_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_kube_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kube_version: Option<String>,
    /// Kubernetes versions this chart release is known to work with
    #[serde(default)]
    pub compatible_with: Vec<String>,
    #[serde(default)]
    pub known_issues: Vec<String>,
}

impl ChartCompatibility {
    /// Whether the minor release of `cluster_version` is in the compatible set
    pub fn supports(&self, cluster_version: &str) -> bool {
        self.compatible_with
            .iter()
            .any(|v| same_minor_version(v, cluster_version))
    }

    pub fn has_known_issues(&self) -> bool {
        !self.known_issues.is_empty()
    }
}

/// A chart with all of its catalogued releases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInfo {
    pub chart_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default)]
    pub versions: Vec<ChartCompatibility>,
}

impl ChartInfo {
    /// Find the entry for an exact chart version
    pub fn version(&self, chart_version: &str) -> Option<&ChartCompatibility> {
        self.versions
            .iter()
            .find(|v| v.chart_version == chart_version)
    }

    /// Highest issue-free release that supports `cluster_version`
    ///
    /// Releases with known issues are never candidates. On equal ordering the
    /// first catalogued entry is kept.
    pub fn best_issue_free(&self, cluster_version: &str) -> Option<&ChartCompatibility> {
        let mut best: Option<&ChartCompatibility> = None;

        for candidate in &self.versions {
            if !candidate.supports(cluster_version) || candidate.has_known_issues() {
                continue;
            }

            let better = match best {
                None => true,
                Some(current) => {
                    compare_chart_versions(&candidate.chart_version, &current.chart_version)
                        == Ordering::Greater
                }
            };
            if better {
                best = Some(candidate);
            }
        }

        best
    }
}

/// On-disk layout of `chart-matrix.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartKnowledgeData {
    #[serde(default)]
    pub charts: Vec<ChartInfo>,
}

/// Outcome of asking which chart version to run on a target cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecommendation {
    pub chart_name: String,
    pub current_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_version: Option<String>,
    pub is_compatible: bool,
    pub message: String,
    #[serde(default)]
    pub known_issues: Vec<String>,
}

/// In-memory index of chart compatibility matrices
#[derive(Debug, Clone, Default)]
pub struct ChartKnowledgeBase {
    charts: HashMap<String, ChartInfo>,
}

impl ChartKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(charts: impl IntoIterator<Item = ChartInfo>) -> Self {
        let mut kb = Self::new();
        for chart in charts {
            kb.insert(chart);
        }
        kb
    }

    /// Load `chart-matrix.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let data: ChartKnowledgeData = read_json(path)?;
        let kb = Self::load(data.charts);
        tracing::debug!(
            path = %path.display(),
            charts = kb.len(),
            "loaded chart knowledge base"
        );
        Ok(kb)
    }

    pub fn insert(&mut self, chart: ChartInfo) {
        self.charts.insert(chart.chart_name.clone(), chart);
    }

    pub fn lookup(&self, chart_name: &str) -> Option<&ChartInfo> {
        self.charts.get(chart_name)
    }

    /// Check a deployed chart version against a cluster version
    ///
    /// Unknown charts and unknown chart versions are reported compatible with
    /// no issues.
    pub fn check_compatibility(
        &self,
        chart_name: &str,
        chart_version: &str,
        cluster_version: &str,
    ) -> (bool, Vec<String>) {
        let Some(entry) = self
            .lookup(chart_name)
            .and_then(|chart| chart.version(chart_version))
        else {
            return (true, Vec::new());
        };

        (entry.supports(cluster_version), entry.known_issues.clone())
    }

    /// Recommend a chart version for the target cluster version
    ///
    /// Keeps the current release when it supports the target and has no known
    /// issues. Otherwise recommends the highest issue-free release that
    /// supports the target, or reports failure when none exists.
    pub fn recommend(
        &self,
        chart_name: &str,
        current_version: &str,
        target_cluster_version: &str,
    ) -> ChartRecommendation {
        let mut recommendation = ChartRecommendation {
            chart_name: chart_name.to_string(),
            current_version: current_version.to_string(),
            recommended_version: None,
            is_compatible: true,
            message: String::new(),
            known_issues: Vec::new(),
        };

        let Some(chart) = self.lookup(chart_name) else {
            recommendation.message =
                "Chart not in knowledge base - compatibility unknown".to_string();
            return recommendation;
        };

        let current = chart.version(current_version);
        if let Some(entry) = current {
            recommendation.known_issues = entry.known_issues.clone();
            if entry.supports(target_cluster_version) && !entry.has_known_issues() {
                recommendation.message = "Current version is compatible".to_string();
                return recommendation;
            }
        }

        recommendation.is_compatible = false;
        match chart.best_issue_free(target_cluster_version) {
            Some(best) => {
                recommendation.recommended_version = Some(best.chart_version.clone());
                recommendation.message =
                    format!("Upgrade required for Kubernetes {}", target_cluster_version);
            }
            None => {
                recommendation.message = format!(
                    "No compatible version found for Kubernetes {}",
                    target_cluster_version
                );
            }
        }

        recommendation
    }

    /// Highest issue-free chart version supporting `cluster_version`
    pub fn recommended_version(&self, chart_name: &str, cluster_version: &str) -> Option<&str> {
        self.lookup(chart_name)?
            .best_issue_free(cluster_version)
            .map(|entry| entry.chart_version.as_str())
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
