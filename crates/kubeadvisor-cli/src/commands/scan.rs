//! Scan command - record the APIs used by local manifests

use std::path::Path;

use console::style;

use kubeadvisor_core::{
    ClusterInventory, HelmReleaseEntry, InventorySource, KubeVersion, ManifestScanner,
};

use crate::error::{CliError, Result};
use crate::settings::Settings;

pub struct ScanArgs<'a> {
    pub manifests: &'a Path,
    pub cluster: Option<&'a str>,
    pub cluster_version: &'a str,
    pub name: Option<&'a str>,
    pub releases: Option<&'a Path>,
}

pub fn run(settings: &Settings, args: ScanArgs<'_>) -> Result<()> {
    super::require_version(args.cluster_version, "--cluster-version")?;
    if !args.manifests.is_dir() {
        return Err(CliError::input(format!(
            "manifest directory {} does not exist",
            args.manifests.display()
        )));
    }

    let cluster_id = settings.cluster_id(args.cluster);
    let store = settings.inventory_store()?;

    let mut inventory = match store.cluster_inventory(&cluster_id) {
        Ok(mut existing) => {
            // Rescans replace what manifests contributed; Helm releases stay.
            existing.manifest_apis.clear();
            existing.crds.clear();
            existing.cluster.kube_version = args.cluster_version.to_string();
            if let Some(name) = args.name {
                existing.cluster.name = name.to_string();
            }
            existing
        }
        Err(kubeadvisor_core::CoreError::ClusterNotFound { .. }) => ClusterInventory::new(
            &cluster_id,
            args.name.unwrap_or(&cluster_id),
            args.cluster_version,
        ),
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} Scanning {} for cluster {}",
        style("→").blue(),
        args.manifests.display(),
        style(&cluster_id).cyan()
    );

    let result = ManifestScanner::new().scan_dir(args.manifests)?;
    result.apply_to(&mut inventory);

    for skipped in &result.skipped_files {
        println!("  {} Skipped {}", style("⚠").yellow(), skipped.display());
    }

    if let Some(path) = args.releases {
        for release in load_releases(path)? {
            inventory.record_helm_release(release);
        }
    }

    inventory.scanned_at = Some(chrono::Utc::now());
    let saved = store.save(&inventory)?;

    println!(
        "  {} {} files, {} resources, {} distinct APIs, {} CRDs, {} Helm releases",
        style("✓").green(),
        result.files_scanned,
        result.resources_found,
        inventory.manifest_apis.len(),
        inventory.crds.len(),
        inventory.helm_releases.len()
    );
    println!("  {} Saved {}", style("✓").green(), saved.display());
    tracing::info!(
        cluster = %cluster_id,
        version = %KubeVersion::parse(args.cluster_version),
        "inventory updated"
    );

    Ok(())
}

/// Read a YAML list of Helm releases
fn load_releases(path: &Path) -> Result<Vec<HelmReleaseEntry>> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| {
        CliError::input_with_help(
            format!("invalid releases file {}: {}", path.display(), e),
            "expected a list of {name, namespace, chart, chartVersion} entries",
        )
    })
}
