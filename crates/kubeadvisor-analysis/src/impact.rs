//! Upgrade impact analyzer
//!
//! Classification rules:
//! - A manifest API removed at the target version is **critical**: applied
//!   workload definitions fail as soon as the API server stops serving them.
//! - A CRD served version removed at the target is **high**: conversion
//!   webhooks may keep older versions working for a while.
//! - A Helm release without a compatible, issue-free chart version is **high**.
//!
//! The overall risk is a fixed priority cascade, not a weighted score: one
//! critical manifest issue dominates any number of lower-severity ones.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use kubeadvisor_core::{
    ApiKnowledgeBase, ApiSource, ChartKnowledgeBase, ClusterInventory, HelmReleaseEntry,
    InventorySource,
};

use crate::error::{AnalysisError, Result};

/// Severity of an upgrade impact
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A used API that the target version no longer serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecatedApiImpact {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub affected_count: usize,
    pub impact_level: ImpactLevel,
    pub deprecated_in: String,
    pub removed_in: String,
    #[serde(rename = "replacementAPI")]
    pub replacement_api: String,
    pub migration_notes: String,
    pub source: ApiSource,
}

impl DeprecatedApiImpact {
    /// `group/version`, or just `version` for the core group
    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// `group/version/kind` key used to group impacts
    pub fn gvk_key(&self) -> String {
        format!("{}/{}/{}", self.group, self.version, self.kind)
    }

    fn same_gvk(&self, group: &str, version: &str, kind: &str) -> bool {
        self.group == group && self.version == version && self.kind == kind
    }
}

/// A Helm release whose chart must change before the upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartImpact {
    pub chart_name: String,
    pub release_name: String,
    pub namespace: String,
    pub current_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_version: Option<String>,
    pub impact_level: ImpactLevel,
    pub message: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Result of analyzing one cluster against one target version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    pub cluster_id: String,
    pub current_version: String,
    pub target_version: String,
    #[serde(rename = "deprecatedManifestAPIs")]
    pub deprecated_manifest_apis: Vec<DeprecatedApiImpact>,
    #[serde(rename = "deprecatedCRDAPIs")]
    pub deprecated_crd_apis: Vec<DeprecatedApiImpact>,
    pub incompatible_charts: Vec<ChartImpact>,
    pub overall_risk: ImpactLevel,
    pub total_issues: usize,
}

impl ImpactAssessment {
    /// Start an empty assessment
    pub fn new(
        cluster_id: impl Into<String>,
        current_version: impl Into<String>,
        target_version: impl Into<String>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            current_version: current_version.into(),
            target_version: target_version.into(),
            deprecated_manifest_apis: Vec::new(),
            deprecated_crd_apis: Vec::new(),
            incompatible_charts: Vec::new(),
            overall_risk: ImpactLevel::None,
            total_issues: 0,
        }
    }

    /// Recompute `total_issues` and `overall_risk` from the impact lists
    pub fn finalize(mut self) -> Self {
        self.total_issues = self.deprecated_manifest_apis.len()
            + self.deprecated_crd_apis.len()
            + self.incompatible_charts.len();
        self.overall_risk = self.compute_overall_risk();
        self
    }

    fn compute_overall_risk(&self) -> ImpactLevel {
        if self.total_issues == 0 {
            return ImpactLevel::None;
        }

        if self
            .deprecated_manifest_apis
            .iter()
            .any(|api| api.impact_level == ImpactLevel::Critical)
        {
            return ImpactLevel::Critical;
        }

        if !self.deprecated_crd_apis.is_empty() || !self.incompatible_charts.is_empty() {
            return ImpactLevel::High;
        }

        ImpactLevel::Medium
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }
}

/// Impact analyzer over shared, read-only knowledge bases
#[derive(Debug, Clone)]
pub struct Analyzer {
    api_kb: Arc<ApiKnowledgeBase>,
    chart_kb: Arc<ChartKnowledgeBase>,
}

impl Analyzer {
    pub fn new(api_kb: Arc<ApiKnowledgeBase>, chart_kb: Arc<ChartKnowledgeBase>) -> Self {
        Self { api_kb, chart_kb }
    }

    /// Load both knowledge bases; any load failure is fatal here
    pub fn from_files(api_path: &Path, chart_path: &Path) -> Result<Self> {
        let api_kb = ApiKnowledgeBase::from_file(api_path)
            .map_err(AnalysisError::KnowledgeBase)?;
        let chart_kb = ChartKnowledgeBase::from_file(chart_path)
            .map_err(AnalysisError::KnowledgeBase)?;
        Ok(Self::new(Arc::new(api_kb), Arc::new(chart_kb)))
    }

    /// Look up a cluster in the inventory and analyze it
    pub fn compute_upgrade_impact(
        &self,
        inventory: &dyn InventorySource,
        cluster_id: &str,
        target_version: &str,
    ) -> Result<ImpactAssessment> {
        let snapshot = inventory.cluster_inventory(cluster_id)?;
        Ok(self.compute_impact(&snapshot, target_version))
    }

    /// Analyze an already materialized inventory
    pub fn compute_impact(
        &self,
        inventory: &ClusterInventory,
        target_version: &str,
    ) -> ImpactAssessment {
        let mut assessment =
            ImpactAssessment::new(inventory.id(), inventory.kube_version(), target_version);

        for api in &inventory.manifest_apis {
            let (bucket, level) = match api.source {
                ApiSource::Manifest => (
                    &mut assessment.deprecated_manifest_apis,
                    ImpactLevel::Critical,
                ),
                ApiSource::Crd => (&mut assessment.deprecated_crd_apis, ImpactLevel::High),
            };
            self.check_api(
                bucket,
                &api.group,
                &api.version,
                &api.kind,
                api.count,
                level,
                api.source,
                target_version,
            );
        }

        for crd in &inventory.crds {
            for version in &crd.served_versions {
                self.check_api(
                    &mut assessment.deprecated_crd_apis,
                    &crd.group,
                    version,
                    &crd.kind,
                    1,
                    ImpactLevel::High,
                    ApiSource::Crd,
                    target_version,
                );
            }
        }

        for release in &inventory.helm_releases {
            if let Some(impact) = self.check_release(release, target_version) {
                assessment.incompatible_charts.push(impact);
            }
        }

        let assessment = assessment.finalize();
        tracing::info!(
            cluster = %assessment.cluster_id,
            target = %assessment.target_version,
            manifest_apis = assessment.deprecated_manifest_apis.len(),
            crd_apis = assessment.deprecated_crd_apis.len(),
            charts = assessment.incompatible_charts.len(),
            risk = %assessment.overall_risk,
            "impact analysis complete"
        );
        assessment
    }

    #[allow(clippy::too_many_arguments)]
    fn check_api(
        &self,
        bucket: &mut Vec<DeprecatedApiImpact>,
        group: &str,
        version: &str,
        kind: &str,
        count: usize,
        level: ImpactLevel,
        source: ApiSource,
        target_version: &str,
    ) {
        if !self.api_kb.is_removed_at_or_after(group, version, kind, target_version) {
            return;
        }
        let Some(dep) = self.api_kb.lookup(group, version, kind) else {
            return;
        };

        if let Some(existing) = bucket
            .iter_mut()
            .find(|impact| impact.same_gvk(group, version, kind))
        {
            existing.affected_count += count;
            return;
        }

        tracing::debug!(
            group,
            version,
            kind,
            removed_in = %dep.removed_in,
            %source,
            "API removed at target"
        );
        bucket.push(DeprecatedApiImpact {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            affected_count: count,
            impact_level: level,
            deprecated_in: dep.deprecated_in.clone(),
            removed_in: dep.removed_in.clone(),
            replacement_api: dep.replacement_api.clone(),
            migration_notes: dep.migration_notes.clone(),
            source,
        });
    }

    fn check_release(
        &self,
        release: &HelmReleaseEntry,
        target_version: &str,
    ) -> Option<ChartImpact> {
        let recommendation = self
            .chart_kb
            .recommend(&release.chart, &release.chart_version, target_version);
        if recommendation.is_compatible {
            return None;
        }

        tracing::debug!(
            release = %release.name,
            chart = %release.chart,
            recommended = ?recommendation.recommended_version,
            "chart incompatible with target"
        );
        Some(ChartImpact {
            chart_name: release.chart.clone(),
            release_name: release.name.clone(),
            namespace: release.namespace.clone(),
            current_version: release.chart_version.clone(),
            recommended_version: recommendation.recommended_version,
            impact_level: ImpactLevel::High,
            message: recommendation.message,
            issues: recommendation.known_issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeadvisor_core::{
        ApiDeprecation, ChartCompatibility, ChartInfo, CrdEntry, ManifestApi, MemoryInventory,
    };

    fn dep(
        group: &str,
        version: &str,
        kind: &str,
        deprecated: &str,
        removed: &str,
    ) -> ApiDeprecation {
        ApiDeprecation {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            deprecated_in: deprecated.to_string(),
            removed_in: removed.to_string(),
            replacement_api: format!("{}/v1 {}", group, kind),
            migration_notes: format!("Move {} to v1", kind),
        }
    }

    fn analyzer() -> Analyzer {
        let api_kb = ApiKnowledgeBase::load(vec![
            dep("networking.k8s.io", "v1beta1", "Ingress", "1.19", "1.22"),
            dep("batch", "v1beta1", "CronJob", "1.21", "1.25"),
            dep("cert-manager.io", "v1alpha2", "Certificate", "1.20", "1.24"),
        ]);
        let chart_kb = ChartKnowledgeBase::load(vec![ChartInfo {
            chart_name: "prometheus".to_string(),
            repository: None,
            versions: vec![
                ChartCompatibility {
                    chart_version: "20.0.0".to_string(),
                    min_kube_version: None,
                    max_kube_version: None,
                    compatible_with: vec!["1.21".to_string(), "1.22".to_string()],
                    known_issues: vec![],
                },
                ChartCompatibility {
                    chart_version: "25.0.0".to_string(),
                    min_kube_version: None,
                    max_kube_version: None,
                    compatible_with: vec!["1.24".to_string(), "1.25".to_string()],
                    known_issues: vec![],
                },
            ],
        }]);
        Analyzer::new(Arc::new(api_kb), Arc::new(chart_kb))
    }

    fn prometheus_release(version: &str) -> HelmReleaseEntry {
        HelmReleaseEntry {
            name: "prom".to_string(),
            namespace: "monitoring".to_string(),
            chart: "prometheus".to_string(),
            chart_version: version.to_string(),
            app_version: None,
        }
    }

    #[test]
    fn test_clean_inventory_has_no_risk() {
        let mut inv = ClusterInventory::new("c1", "test", "1.24");
        inv.record_manifest_api(ManifestApi::new("apps", "v1", "Deployment"));

        let assessment = analyzer().compute_impact(&inv, "1.25");
        assert_eq!(assessment.total_issues, 0);
        assert_eq!(assessment.overall_risk, ImpactLevel::None);
        assert!(!assessment.has_issues());
    }

    #[test]
    fn test_removed_manifest_api_is_critical() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_manifest_api(ManifestApi::new("networking.k8s.io", "v1beta1", "Ingress"));

        let assessment = analyzer().compute_impact(&inv, "1.25");
        assert_eq!(assessment.deprecated_manifest_apis.len(), 1);

        let impact = &assessment.deprecated_manifest_apis[0];
        assert_eq!(impact.impact_level, ImpactLevel::Critical);
        assert_eq!(impact.source, ApiSource::Manifest);
        assert_eq!(impact.removed_in, "1.22");
        assert_eq!(assessment.overall_risk, ImpactLevel::Critical);
    }

    #[test]
    fn test_api_not_yet_removed_is_ignored() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_manifest_api(ManifestApi::new("batch", "v1beta1", "CronJob"));

        let assessment = analyzer().compute_impact(&inv, "1.24");
        assert_eq!(assessment.total_issues, 0);
    }

    #[test]
    fn test_affected_count_carried() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        let mut api = ManifestApi::new("batch", "v1beta1", "CronJob");
        api.count = 7;
        inv.record_manifest_api(api);

        let assessment = analyzer().compute_impact(&inv, "1.25");
        assert_eq!(assessment.deprecated_manifest_apis[0].affected_count, 7);
    }

    #[test]
    fn test_crd_served_version_is_high() {
        let mut inv = ClusterInventory::new("c1", "test", "1.22");
        inv.record_crd(CrdEntry {
            name: "certificates.cert-manager.io".to_string(),
            group: "cert-manager.io".to_string(),
            kind: "Certificate".to_string(),
            served_versions: vec!["v1alpha2".to_string(), "v1".to_string()],
        });

        let assessment = analyzer().compute_impact(&inv, "1.24");
        assert_eq!(assessment.deprecated_crd_apis.len(), 1);
        let impact = &assessment.deprecated_crd_apis[0];
        assert_eq!(impact.impact_level, ImpactLevel::High);
        assert_eq!(impact.source, ApiSource::Crd);
        assert_eq!(assessment.overall_risk, ImpactLevel::High);
    }

    #[test]
    fn test_incompatible_chart() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_helm_release(prometheus_release("20.0.0"));

        let assessment = analyzer().compute_impact(&inv, "1.25");
        assert_eq!(assessment.incompatible_charts.len(), 1);

        let chart = &assessment.incompatible_charts[0];
        assert_eq!(chart.recommended_version.as_deref(), Some("25.0.0"));
        assert_eq!(chart.impact_level, ImpactLevel::High);
        assert_eq!(chart.release_name, "prom");
        assert_eq!(assessment.overall_risk, ImpactLevel::High);
    }

    #[test]
    fn test_unknown_chart_and_api_produce_nothing() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_manifest_api(ManifestApi::new("example.com", "v1alpha1", "Widget"));
        inv.record_helm_release(HelmReleaseEntry {
            name: "grafana".to_string(),
            namespace: "monitoring".to_string(),
            chart: "grafana".to_string(),
            chart_version: "6.0.0".to_string(),
            app_version: None,
        });

        let assessment = analyzer().compute_impact(&inv, "1.30");
        assert_eq!(assessment.total_issues, 0);
        assert_eq!(assessment.overall_risk, ImpactLevel::None);
    }

    #[test]
    fn test_critical_dominates() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_manifest_api(ManifestApi::new("networking.k8s.io", "v1beta1", "Ingress"));
        inv.record_crd(CrdEntry {
            name: "certificates.cert-manager.io".to_string(),
            group: "cert-manager.io".to_string(),
            kind: "Certificate".to_string(),
            served_versions: vec!["v1alpha2".to_string()],
        });
        inv.record_helm_release(prometheus_release("20.0.0"));

        let assessment = analyzer().compute_impact(&inv, "1.25");
        assert_eq!(assessment.total_issues, 3);
        assert_eq!(assessment.overall_risk, ImpactLevel::Critical);
    }

    #[test]
    fn test_medium_when_only_non_critical_manifest_impacts() {
        let mut assessment = ImpactAssessment::new("c1", "1.21", "1.25");
        assessment.deprecated_manifest_apis.push(DeprecatedApiImpact {
            group: "batch".to_string(),
            version: "v1beta1".to_string(),
            kind: "CronJob".to_string(),
            affected_count: 1,
            impact_level: ImpactLevel::Medium,
            deprecated_in: "1.21".to_string(),
            removed_in: "1.25".to_string(),
            replacement_api: "batch/v1 CronJob".to_string(),
            migration_notes: String::new(),
            source: ApiSource::Manifest,
        });

        let assessment = assessment.finalize();
        assert_eq!(assessment.total_issues, 1);
        assert_eq!(assessment.overall_risk, ImpactLevel::Medium);
    }

    #[test]
    fn test_compute_upgrade_impact_unknown_cluster() {
        let source = MemoryInventory::new();
        let result = analyzer().compute_upgrade_impact(&source, "missing", "1.25");
        assert!(matches!(result, Err(AnalysisError::ClusterNotFound { id }) if id == "missing"));
    }

    #[test]
    fn test_compute_upgrade_impact_from_source() {
        let mut inv = ClusterInventory::new("prod", "production", "v1.21.4");
        inv.record_manifest_api(ManifestApi::new("networking.k8s.io", "v1beta1", "Ingress"));
        let source = MemoryInventory::with_inventories(vec![inv]);

        let assessment = analyzer()
            .compute_upgrade_impact(&source, "prod", "1.25")
            .unwrap();
        assert_eq!(assessment.cluster_id, "prod");
        assert_eq!(assessment.current_version, "v1.21.4");
        assert_eq!(assessment.target_version, "1.25");
    }

    #[test]
    fn test_from_files_missing_knowledge_base() {
        let result = Analyzer::from_files(
            Path::new("/nonexistent/apis.json"),
            Path::new("/nonexistent/charts.json"),
        );
        assert!(matches!(result, Err(AnalysisError::KnowledgeBase(_))));
    }

    #[test]
    fn test_impact_level_ordering() {
        assert!(ImpactLevel::Critical > ImpactLevel::High);
        assert!(ImpactLevel::High > ImpactLevel::Medium);
        assert!(ImpactLevel::Low > ImpactLevel::None);
        assert_eq!(ImpactLevel::Critical.to_string(), "critical");
    }

    #[test]
    fn test_assessment_json_shape() {
        let mut inv = ClusterInventory::new("c1", "test", "1.21");
        inv.record_manifest_api(ManifestApi::new("networking.k8s.io", "v1beta1", "Ingress"));
        let assessment = analyzer().compute_impact(&inv, "1.25");

        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["overallRisk"], "critical");
        assert_eq!(json["totalIssues"], 1);
        assert_eq!(json["deprecatedManifestAPIs"][0]["source"], "manifest");
        assert_eq!(
            json["deprecatedManifestAPIs"][0]["replacementAPI"],
            "networking.k8s.io/v1 Ingress"
        );
    }
}
