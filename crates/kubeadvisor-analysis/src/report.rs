//! Plain-text impact report

use std::fmt::Write;

use crate::impact::{DeprecatedApiImpact, ImpactAssessment};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Render a human-readable report of an assessment
pub fn render_report(assessment: &ImpactAssessment) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Upgrade Impact Assessment ===");
    let _ = writeln!(out, "Cluster: {}", assessment.cluster_id);
    let _ = writeln!(out, "Current Version: {}", assessment.current_version);
    let _ = writeln!(out, "Target Version: {}", assessment.target_version);
    let _ = writeln!(out, "Overall Risk: {}", assessment.overall_risk);
    let _ = writeln!(out, "Total Issues: {}", assessment.total_issues);

    render_api_section(
        &mut out,
        "DEPRECATED MANIFEST APIs",
        &assessment.deprecated_manifest_apis,
    );
    render_api_section(
        &mut out,
        "DEPRECATED CRD APIs",
        &assessment.deprecated_crd_apis,
    );

    if !assessment.incompatible_charts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "⚠ INCOMPATIBLE HELM CHARTS ({})",
            assessment.incompatible_charts.len()
        );
        let _ = writeln!(out, "{}", RULE);
        for (i, chart) in assessment.incompatible_charts.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({}/{}) {}",
                i + 1,
                chart.chart_name,
                chart.namespace,
                chart.release_name,
                chart.current_version
            );
            let _ = writeln!(out, "   Impact: {}", chart.impact_level);
            if let Some(version) = &chart.recommended_version {
                let _ = writeln!(out, "   Recommended: {}", version);
            }
            let _ = writeln!(out, "   {}", chart.message);
            for issue in &chart.issues {
                let _ = writeln!(out, "   Known issue: {}", issue);
            }
        }
    }

    if !assessment.has_issues() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "✓ No deprecated APIs or incompatible charts found. Safe to upgrade!"
        );
    }

    out
}

fn render_api_section(out: &mut String, title: &str, apis: &[DeprecatedApiImpact]) {
    if apis.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "⚠ {} ({})", title, apis.len());
    let _ = writeln!(out, "{}", RULE);
    for (i, api) in apis.iter().enumerate() {
        let _ = writeln!(out, "{}. {} {}", i + 1, api.group_version(), api.kind);
        let _ = writeln!(out, "   Impact: {}", api.impact_level);
        let _ = writeln!(out, "   Affected: {}", api.affected_count);
        let _ = writeln!(out, "   Removed In: v{}", api.removed_in);
        if !api.replacement_api.is_empty() {
            let _ = writeln!(out, "   Replacement: {}", api.replacement_api);
        }
        if !api.migration_notes.is_empty() {
            let _ = writeln!(out, "   Migration: {}", api.migration_notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::{ChartImpact, ImpactLevel};
    use kubeadvisor_core::ApiSource;

    fn core_api_impact() -> DeprecatedApiImpact {
        DeprecatedApiImpact {
            group: String::new(),
            version: "v1beta1".to_string(),
            kind: "Eviction".to_string(),
            affected_count: 2,
            impact_level: ImpactLevel::Critical,
            deprecated_in: "1.19".to_string(),
            removed_in: "1.22".to_string(),
            replacement_api: "policy/v1 Eviction".to_string(),
            migration_notes: String::new(),
            source: ApiSource::Manifest,
        }
    }

    #[test]
    fn test_report_without_issues() {
        let assessment = ImpactAssessment::new("cluster-1", "1.24", "1.25").finalize();
        insta::assert_snapshot!(render_report(&assessment), @r"
        === Upgrade Impact Assessment ===
        Cluster: cluster-1
        Current Version: 1.24
        Target Version: 1.25
        Overall Risk: none
        Total Issues: 0

        ✓ No deprecated APIs or incompatible charts found. Safe to upgrade!
        ");
    }

    #[test]
    fn test_report_core_group_rendering() {
        let mut assessment = ImpactAssessment::new("cluster-1", "1.21", "1.25");
        assessment.deprecated_manifest_apis.push(core_api_impact());
        let report = render_report(&assessment.finalize());

        assert!(report.contains("DEPRECATED MANIFEST APIs (1)"));
        assert!(report.contains("1. v1beta1 Eviction"));
        assert!(report.contains("Removed In: v1.22"));
        assert!(report.contains("Replacement: policy/v1 Eviction"));
        assert!(!report.contains("Migration:"));
        assert!(!report.contains("Safe to upgrade"));
    }

    #[test]
    fn test_report_charts() {
        let mut assessment = ImpactAssessment::new("cluster-1", "1.21", "1.25");
        assessment.incompatible_charts.push(ChartImpact {
            chart_name: "prometheus".to_string(),
            release_name: "prom".to_string(),
            namespace: "monitoring".to_string(),
            current_version: "20.0.0".to_string(),
            recommended_version: Some("25.0.0".to_string()),
            impact_level: ImpactLevel::High,
            message: "Upgrade required for Kubernetes 1.25".to_string(),
            issues: vec!["old CRDs".to_string()],
        });
        let report = render_report(&assessment.finalize());

        assert!(report.contains("Overall Risk: high"));
        assert!(report.contains("1. prometheus (monitoring/prom) 20.0.0"));
        assert!(report.contains("Recommended: 25.0.0"));
        assert!(report.contains("Known issue: old CRDs"));
    }
}
