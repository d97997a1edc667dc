//! In-memory inventory source
//!
//! Holds inventories in memory, useful for unit tests and for callers that
//! already have a snapshot materialized.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::{ClusterInventory, ClusterRecord, InventorySource};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    clusters: Arc<RwLock<BTreeMap<String, ClusterInventory>>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated inventories
    pub fn with_inventories(inventories: Vec<ClusterInventory>) -> Self {
        let source = Self::new();
        for inventory in inventories {
            source.insert(inventory);
        }
        source
    }

    pub fn insert(&self, inventory: ClusterInventory) {
        let mut clusters = self.clusters.write().unwrap_or_else(|e| e.into_inner());
        clusters.insert(inventory.id().to_string(), inventory);
    }
}

impl InventorySource for MemoryInventory {
    fn cluster_inventory(&self, cluster_id: &str) -> Result<ClusterInventory> {
        let clusters = self.clusters.read().unwrap_or_else(|e| e.into_inner());
        clusters
            .get(cluster_id)
            .cloned()
            .ok_or_else(|| CoreError::ClusterNotFound {
                id: cluster_id.to_string(),
            })
    }

    fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        let clusters = self.clusters.read().unwrap_or_else(|e| e.into_inner());
        Ok(clusters.values().map(|inv| inv.cluster.clone()).collect())
    }
}
