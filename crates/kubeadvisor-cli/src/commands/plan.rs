//! Plan command - print only the ordered upgrade plan

use kubeadvisor_planner::Planner;

use crate::display;
use crate::error::Result;
use crate::settings::Settings;

pub fn run(
    settings: &Settings,
    cluster: Option<&str>,
    target: &str,
    output_json: bool,
) -> Result<()> {
    super::require_version(target, "--target")?;

    let cluster_id = settings.cluster_id(cluster);
    let store = settings.inventory_store()?;
    let assessment = settings
        .analyzer()?
        .compute_upgrade_impact(&store, &cluster_id, target)?;

    let planner = Planner::new();
    let plan = planner.generate_plan(&assessment)?;
    planner.validate_plan(&plan)?;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display::print_plan(&plan, true);
    }

    Ok(())
}
