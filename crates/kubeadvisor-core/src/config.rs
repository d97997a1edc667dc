//! User configuration
//!
//! Stored in `~/.config/kubeadvisor/config.yaml`. Every field has a default,
//! so a missing file is equivalent to an empty one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// kubeadvisor configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Deprecation knowledge base (`apis.json`)
    #[serde(default = "default_api_knowledge_path")]
    pub api_knowledge_path: PathBuf,

    /// Chart compatibility knowledge base (`chart-matrix.json`)
    #[serde(default = "default_chart_knowledge_path")]
    pub chart_knowledge_path: PathBuf,

    /// Directory holding inventory snapshots
    #[serde(default = "default_inventory_dir")]
    pub inventory_dir: PathBuf,

    /// Cluster used when none is given on the command line
    #[serde(default = "default_cluster")]
    pub default_cluster: String,
}

fn default_api_version() -> String {
    "kubeadvisor.io/v1".to_string()
}

fn default_api_knowledge_path() -> PathBuf {
    PathBuf::from("knowledge-base/apis.json")
}

fn default_chart_knowledge_path() -> PathBuf {
    PathBuf::from("knowledge-base/chart-matrix.json")
}

fn default_inventory_dir() -> PathBuf {
    PathBuf::from(".kubeadvisor/inventory")
}

fn default_cluster() -> String {
    "cluster-1".to_string()
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            api_knowledge_path: default_api_knowledge_path(),
            chart_knowledge_path: default_chart_knowledge_path(),
            inventory_dir: default_inventory_dir(),
            default_cluster: default_cluster(),
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// Malformed YAML and invalid values are reported as `InvalidConfig`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let invalid = |e: serde_yaml::Error| CoreError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        };
        let config: Self = serde_yaml::from_str(&content).map_err(invalid)?;
        if config.default_cluster.is_empty() {
            return Err(CoreError::InvalidConfig {
                message: format!("{}: defaultCluster must not be empty", path.display()),
            });
        }
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CoreError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("kubeadvisor").join("config.yaml"))
    }
}
