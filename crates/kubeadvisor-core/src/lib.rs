//! kubeadvisor Core - Foundational types for Kubernetes upgrade planning
//!
//! This crate provides the building blocks shared by the analyzer and planner:
//! - `version`: Kubernetes (major.minor) and chart (major.minor.patch) version ordering
//! - `knowledge`: API deprecation and Helm chart compatibility knowledge bases
//! - `inventory`: Cluster inventory model and inventory sources
//! - `manifests`: Local manifest scanning into inventory entries
//! - `config`: User configuration

pub mod config;
pub mod error;
pub mod inventory;
pub mod knowledge;
pub mod manifests;
pub mod version;

pub use config::AdvisorConfig;
pub use error::{CoreError, Result};
pub use inventory::{
    ApiSource, ClusterInventory, ClusterRecord, CrdEntry, FileInventoryStore, HelmReleaseEntry,
    InventorySource, ManifestApi, MemoryInventory,
};
pub use knowledge::{
    ApiDeprecation, ApiKnowledgeBase, ChartCompatibility, ChartInfo, ChartKnowledgeBase,
    ChartRecommendation,
};
pub use manifests::{ManifestScanner, ScanResult, parse_api_version};
pub use version::{KubeVersion, compare_chart_versions, compare_kube_versions, is_at_least};
