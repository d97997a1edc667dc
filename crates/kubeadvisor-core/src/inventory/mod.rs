//! Cluster inventory
//!
//! The inventory is the materialized snapshot the analyzer works on: the
//! cluster's current version, the distinct APIs seen in manifests, the CRDs
//! with their served versions, and the deployed Helm releases.
//!
//! Where the snapshot comes from is behind [`InventorySource`]:
//! - [`FileInventoryStore`]: one YAML snapshot per cluster on disk
//! - [`MemoryInventory`]: in-memory, for tests and embedding

mod file;
mod memory;

pub use file::FileInventoryStore;
pub use memory::MemoryInventory;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Read access to stored cluster inventories
pub trait InventorySource: Send + Sync {
    /// Get the inventory of a cluster, failing with `ClusterNotFound` for unknown ids
    fn cluster_inventory(&self, cluster_id: &str) -> Result<ClusterInventory>;

    /// List every known cluster
    fn list_clusters(&self) -> Result<Vec<ClusterRecord>>;
}

/// Identity of a scanned cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub id: String,
    pub name: String,
    pub kube_version: String,
}

/// Where an API usage was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSource {
    /// A workload definition applied from manifests
    #[default]
    Manifest,
    /// A version served by a CustomResourceDefinition
    Crd,
}

impl fmt::Display for ApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest => write!(f, "manifest"),
            Self::Crd => write!(f, "crd"),
        }
    }
}

/// A distinct API surface seen in manifests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestApi {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
    #[serde(default)]
    pub source: ApiSource,
    /// How many objects use this API
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

impl ManifestApi {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            source: ApiSource::Manifest,
            count: 1,
        }
    }

    fn same_gvk(&self, other: &ManifestApi) -> bool {
        self.group == other.group && self.version == other.version && self.kind == other.kind
    }
}

/// A CustomResourceDefinition installed in the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdEntry {
    pub name: String,
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub served_versions: Vec<String>,
}

/// A deployed Helm release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseEntry {
    /// Release name
    pub name: String,
    pub namespace: String,
    /// Chart name
    pub chart: String,
    pub chart_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// Point-in-time inventory of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInventory {
    pub cluster: ClusterRecord,
    #[serde(default)]
    pub manifest_apis: Vec<ManifestApi>,
    #[serde(default)]
    pub crds: Vec<CrdEntry>,
    #[serde(default)]
    pub helm_releases: Vec<HelmReleaseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,
}

impl ClusterInventory {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kube_version: impl Into<String>,
    ) -> Self {
        Self {
            cluster: ClusterRecord {
                id: id.into(),
                name: name.into(),
                kube_version: kube_version.into(),
            },
            manifest_apis: Vec::new(),
            crds: Vec::new(),
            helm_releases: Vec::new(),
            scanned_at: None,
        }
    }

    /// Record an API usage, merging with an existing entry for the same GVK
    pub fn record_manifest_api(&mut self, api: ManifestApi) {
        match self.manifest_apis.iter_mut().find(|a| a.same_gvk(&api)) {
            Some(existing) => existing.count += api.count,
            None => self.manifest_apis.push(api),
        }
    }

    /// Add or replace a CRD by name
    pub fn record_crd(&mut self, crd: CrdEntry) {
        match self.crds.iter_mut().find(|c| c.name == crd.name) {
            Some(existing) => *existing = crd,
            None => self.crds.push(crd),
        }
    }

    /// Add or replace a Helm release by (namespace, name)
    pub fn record_helm_release(&mut self, release: HelmReleaseEntry) {
        match self
            .helm_releases
            .iter_mut()
            .find(|r| r.name == release.name && r.namespace == release.namespace)
        {
            Some(existing) => *existing = release,
            None => self.helm_releases.push(release),
        }
    }

    pub fn id(&self) -> &str {
        &self.cluster.id
    }

    pub fn kube_version(&self) -> &str {
        &self.cluster.kube_version
    }
}
