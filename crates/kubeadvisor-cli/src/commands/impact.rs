//! Impact command - assess an upgrade and plan the remediation

use console::style;

use kubeadvisor_core::compare_kube_versions;
use kubeadvisor_planner::{AssessmentWithPlan, Planner};

use crate::display;
use crate::error::Result;
use crate::settings::Settings;

pub fn run(
    settings: &Settings,
    cluster: Option<&str>,
    target: &str,
    output_json: bool,
    show_actions: bool,
) -> Result<()> {
    super::require_version(target, "--target")?;

    let cluster_id = settings.cluster_id(cluster);
    let store = settings.inventory_store()?;
    let analyzer = settings.analyzer()?;

    let assessment = analyzer.compute_upgrade_impact(&store, &cluster_id, target)?;
    let planner = Planner::new();
    let plan = planner.generate_plan(&assessment)?;
    planner.validate_plan(&plan)?;

    if output_json {
        let response = AssessmentWithPlan::new(assessment, plan);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if compare_kube_versions(target, &assessment.current_version).is_le() {
        println!(
            "{} Target {} is not newer than the current version {}",
            style("⚠").yellow(),
            target,
            assessment.current_version
        );
        println!();
    }

    display::print_assessment(&assessment);
    println!();
    display::print_plan(&plan, show_actions);

    Ok(())
}
