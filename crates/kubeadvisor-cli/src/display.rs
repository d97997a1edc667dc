//! Terminal output for assessments, plans and inventories

use console::{StyledObject, style};

use kubeadvisor_analysis::{DeprecatedApiImpact, ImpactAssessment, ImpactLevel};
use kubeadvisor_core::{ClusterInventory, ClusterRecord};
use kubeadvisor_planner::{UpgradePlan, UpgradeStep};

/// Color an impact level by severity
pub fn styled_impact(level: ImpactLevel) -> StyledObject<&'static str> {
    let s = style(level.as_str());
    match level {
        ImpactLevel::Critical => s.red().bold(),
        ImpactLevel::High => s.red(),
        ImpactLevel::Medium => s.yellow(),
        ImpactLevel::Low => s.cyan(),
        ImpactLevel::None => s.green(),
    }
}

pub fn print_assessment(assessment: &ImpactAssessment) {
    println!("{}", style("Upgrade Impact Assessment").bold());
    println!("  {:<16} {}", "Cluster:", assessment.cluster_id);
    println!(
        "  {:<16} {} {} {}",
        "Upgrade:",
        assessment.current_version,
        style("→").dim(),
        assessment.target_version
    );
    println!(
        "  {:<16} {}",
        "Overall risk:",
        styled_impact(assessment.overall_risk)
    );
    println!("  {:<16} {}", "Total issues:", assessment.total_issues);

    print_api_section(
        "Deprecated manifest APIs",
        &assessment.deprecated_manifest_apis,
    );
    print_api_section("Deprecated CRD APIs", &assessment.deprecated_crd_apis);

    if !assessment.incompatible_charts.is_empty() {
        println!();
        println!(
            "{} {} ({})",
            style("⚠").yellow(),
            style("Incompatible Helm charts").bold(),
            assessment.incompatible_charts.len()
        );
        for chart in &assessment.incompatible_charts {
            println!(
                "  {} {} {}/{} {}",
                style("•").dim(),
                style(&chart.chart_name).cyan(),
                chart.namespace,
                chart.release_name,
                style(&chart.current_version).dim()
            );
            println!("      impact: {}", styled_impact(chart.impact_level));
            if let Some(version) = &chart.recommended_version {
                println!("      {} {}", style("recommended:").blue(), version);
            }
            println!("      {}", chart.message);
            for issue in &chart.issues {
                println!("      {} {}", style("known issue:").yellow(), issue);
            }
        }
    }

    if !assessment.has_issues() {
        println!();
        println!(
            "{} No deprecated APIs or incompatible charts found. Safe to upgrade!",
            style("✓").green()
        );
    }
}

fn print_api_section(title: &str, apis: &[DeprecatedApiImpact]) {
    if apis.is_empty() {
        return;
    }

    println!();
    println!(
        "{} {} ({})",
        style("⚠").yellow(),
        style(title).bold(),
        apis.len()
    );
    for api in apis {
        println!(
            "  {} {} {} {}",
            style("•").dim(),
            api.group_version(),
            style(&api.kind).cyan(),
            style(format!("x{}", api.affected_count)).dim()
        );
        println!(
            "      impact: {}  removed in: v{}",
            styled_impact(api.impact_level),
            api.removed_in
        );
        if !api.replacement_api.is_empty() {
            println!(
                "      {} {}",
                style("replacement:").blue(),
                api.replacement_api
            );
        }
        if !api.migration_notes.is_empty() {
            println!(
                "      {} {}",
                style("migration:").blue(),
                api.migration_notes
            );
        }
    }
}

pub fn print_plan(plan: &UpgradePlan, show_actions: bool) {
    println!(
        "{} ({} steps, {})",
        style(format!(
            "Upgrade plan {} → {}",
            plan.from_version, plan.to_version
        ))
        .bold(),
        plan.total_steps,
        plan.timeline
    );

    for (i, step) in plan.steps.iter().enumerate() {
        print_step(i + 1, step, show_actions);
    }
}

fn print_step(position: usize, step: &UpgradeStep, show_actions: bool) {
    println!(
        "  {:>2}. {} {} {}",
        position,
        style(format!("[{}]", step.step_type)).dim(),
        step.description,
        styled_impact(step.impact)
    );

    if !show_actions {
        return;
    }
    if !step.dependencies.is_empty() {
        println!(
            "        {} {}",
            style("after:").dim(),
            step.dependencies.join(", ")
        );
    }
    for action in &step.actions {
        println!("        {} {}", style("$").green(), action.command);
        if !action.description.is_empty() {
            println!("          {}", style(&action.description).dim());
        }
    }
}

pub fn print_clusters(clusters: &[ClusterRecord]) {
    if clusters.is_empty() {
        println!("No clusters in inventory");
        return;
    }

    println!(
        "{:<20} {:<24} {:<10}",
        style("ID").bold(),
        style("NAME").bold(),
        style("VERSION").bold()
    );
    for cluster in clusters {
        println!(
            "{:<20} {:<24} {:<10}",
            cluster.id, cluster.name, cluster.kube_version
        );
    }
}

pub fn print_inventory(inventory: &ClusterInventory) {
    println!(
        "{} {} (Kubernetes {})",
        style("Cluster").bold(),
        style(inventory.id()).cyan(),
        inventory.kube_version()
    );
    if let Some(scanned_at) = inventory.scanned_at {
        println!(
            "  scanned at {}",
            scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    println!();
    println!(
        "{} ({})",
        style("APIs in use").bold(),
        inventory.manifest_apis.len()
    );
    for api in &inventory.manifest_apis {
        let gv = if api.group.is_empty() {
            api.version.clone()
        } else {
            format!("{}/{}", api.group, api.version)
        };
        println!(
            "  {:<40} {:<28} {:>4} {}",
            gv,
            api.kind,
            api.count,
            style(api.source).dim()
        );
    }

    println!();
    println!("{} ({})", style("CRDs").bold(), inventory.crds.len());
    for crd in &inventory.crds {
        println!("  {:<48} {}", crd.name, crd.served_versions.join(", "));
    }

    println!();
    println!(
        "{} ({})",
        style("Helm releases").bold(),
        inventory.helm_releases.len()
    );
    for release in &inventory.helm_releases {
        println!(
            "  {:<30} {}-{}",
            format!("{}/{}", release.namespace, release.name),
            release.chart,
            release.chart_version
        );
    }
}
