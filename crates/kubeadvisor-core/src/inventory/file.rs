//! File-based inventory store
//!
//! Stores one YAML snapshot per cluster under a base directory:
//!
//! ```text
//! <base_dir>/
//!   cluster-1.yaml
//!   staging.yaml
//! ```

use std::path::{Path, PathBuf};

use super::{ClusterInventory, ClusterRecord, InventorySource};
use crate::error::{CoreError, Result};

/// Directory of per-cluster YAML snapshots
#[derive(Debug, Clone)]
pub struct FileInventoryStore {
    base_dir: PathBuf,
}

impl FileInventoryStore {
    /// Open a store, creating the base directory if needed
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Snapshot file for a cluster, rejecting ids that would leave the base directory
    fn snapshot_path(&self, cluster_id: &str) -> Result<PathBuf> {
        validate_cluster_id(cluster_id)?;
        Ok(self.base_dir.join(format!("{}.yaml", cluster_id)))
    }

    fn read_snapshot(&self, path: &Path) -> Result<ClusterInventory> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| CoreError::InvalidInventory {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write (or overwrite) a cluster snapshot
    pub fn save(&self, inventory: &ClusterInventory) -> Result<PathBuf> {
        let path = self.snapshot_path(inventory.id())?;
        let content = serde_yaml::to_string(inventory)?;
        std::fs::write(&path, content)?;

        tracing::debug!(
            cluster = inventory.id(),
            path = %path.display(),
            "saved inventory snapshot"
        );
        Ok(path)
    }

    /// Remove a cluster snapshot; returns whether one existed
    pub fn clear(&self, cluster_id: &str) -> Result<bool> {
        let path = self.snapshot_path(cluster_id)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

impl InventorySource for FileInventoryStore {
    fn cluster_inventory(&self, cluster_id: &str) -> Result<ClusterInventory> {
        let path = self.snapshot_path(cluster_id)?;
        if !path.exists() {
            return Err(CoreError::ClusterNotFound {
                id: cluster_id.to_string(),
            });
        }
        self.read_snapshot(&path)
    }

    fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.base_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == "yaml").unwrap_or(false))
            .collect();
        files.sort();

        let mut clusters = Vec::new();
        for file in files {
            match self.read_snapshot(&file) {
                Ok(inventory) => clusters.push(inventory.cluster),
                Err(e) => tracing::warn!("Skipping unreadable snapshot {}: {}", file.display(), e),
            }
        }

        Ok(clusters)
    }
}

fn validate_cluster_id(id: &str) -> Result<()> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(CoreError::InvalidClusterId { id: id.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{CrdEntry, ManifestApi};
    use tempfile::TempDir;

    fn sample_inventory(id: &str) -> ClusterInventory {
        let mut inv = ClusterInventory::new(id, "test-cluster", "1.21.0");
        inv.record_manifest_api(ManifestApi::new("networking.k8s.io", "v1beta1", "Ingress"));
        inv.record_crd(CrdEntry {
            name: "certificates.cert-manager.io".to_string(),
            group: "cert-manager.io".to_string(),
            kind: "Certificate".to_string(),
            served_versions: vec!["v1alpha2".to_string(), "v1".to_string()],
        });
        inv
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileInventoryStore::new(dir.path()).unwrap();

        let inv = sample_inventory("cluster-1");
        store.save(&inv).unwrap();

        let loaded = store.cluster_inventory("cluster-1").unwrap();
        assert_eq!(loaded, inv);
    }

    #[test]
    fn test_unknown_cluster() {
        let dir = TempDir::new().unwrap();
        let store = FileInventoryStore::new(dir.path()).unwrap();

        let result = store.cluster_inventory("missing");
        assert!(matches!(result, Err(CoreError::ClusterNotFound { id }) if id == "missing"));
    }

    #[test]
    fn test_list_clusters_sorted() {
        let dir = TempDir::new().unwrap();
        let store = FileInventoryStore::new(dir.path()).unwrap();
        store.save(&sample_inventory("staging")).unwrap();
        store.save(&sample_inventory("prod")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = store
            .list_clusters()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["prod", "staging"]);
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileInventoryStore::new(dir.path()).unwrap();
        store.save(&sample_inventory("cluster-1")).unwrap();

        assert!(store.clear("cluster-1").unwrap());
        assert!(!store.clear("cluster-1").unwrap());
        assert!(store.cluster_inventory("cluster-1").is_err());
    }

    #[test]
    fn test_rejects_path_like_id() {
        let dir = TempDir::new().unwrap();
        let store = FileInventoryStore::new(dir.path().join("inventory")).unwrap();
        std::fs::write(dir.path().join("escape.yaml"), "not: an inventory\n").unwrap();

        let invalid = |r: Result<_>| matches!(r, Err(CoreError::InvalidClusterId { .. }));
        assert!(invalid(store.save(&sample_inventory("../escape")).map(|_| ())));
        assert!(invalid(store.cluster_inventory("../escape").map(|_| ())));
        assert!(invalid(store.clear("../escape").map(|_| ())));
        assert!(invalid(store.cluster_inventory("").map(|_| ())));
        assert!(invalid(store.clear("nested\\id").map(|_| ())));

        assert!(dir.path().join("escape.yaml").exists());
    }
}
