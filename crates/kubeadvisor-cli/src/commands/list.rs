//! List command - show stored cluster inventories

use kubeadvisor_core::InventorySource;

use crate::display;
use crate::error::Result;
use crate::settings::Settings;

pub fn run(settings: &Settings, cluster: Option<&str>, output_json: bool) -> Result<()> {
    let store = settings.inventory_store()?;

    match cluster {
        Some(id) => {
            let inventory = store.cluster_inventory(id)?;
            if output_json {
                println!("{}", serde_json::to_string_pretty(&inventory)?);
            } else {
                display::print_inventory(&inventory);
            }
        }
        None => {
            let clusters = store.list_clusters()?;
            if output_json {
                println!("{}", serde_json::to_string_pretty(&clusters)?);
            } else {
                display::print_clusters(&clusters);
            }
        }
    }

    Ok(())
}
