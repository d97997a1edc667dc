//! Effective settings for a command invocation
//!
//! Flag (or its environment variable) wins over the config file, which wins
//! over built-in defaults.

use std::path::PathBuf;

use kubeadvisor_analysis::Analyzer;
use kubeadvisor_core::{AdvisorConfig, FileInventoryStore};

use crate::error::Result;

/// Global options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub api_knowledge: Option<PathBuf>,
    pub chart_knowledge: Option<PathBuf>,
    pub inventory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_knowledge: PathBuf,
    pub chart_knowledge: PathBuf,
    pub inventory_dir: PathBuf,
    pub default_cluster: String,
}

impl Settings {
    /// Load the config file and apply overrides
    pub fn resolve(options: &GlobalOptions) -> Result<Self> {
        let config = match &options.config {
            Some(path) => AdvisorConfig::load_from(path)?,
            None => match AdvisorConfig::default_path() {
                Ok(path) if path.exists() => AdvisorConfig::load_from(&path)?,
                _ => AdvisorConfig::default(),
            },
        };
        Ok(Self::from_config(config, options))
    }

    pub fn from_config(config: AdvisorConfig, options: &GlobalOptions) -> Self {
        Self {
            api_knowledge: options
                .api_knowledge
                .clone()
                .unwrap_or(config.api_knowledge_path),
            chart_knowledge: options
                .chart_knowledge
                .clone()
                .unwrap_or(config.chart_knowledge_path),
            inventory_dir: options.inventory.clone().unwrap_or(config.inventory_dir),
            default_cluster: config.default_cluster,
        }
    }

    /// Cluster id from the command line, or the configured default
    pub fn cluster_id(&self, requested: Option<&str>) -> String {
        requested.unwrap_or(&self.default_cluster).to_string()
    }

    pub fn analyzer(&self) -> Result<Analyzer> {
        tracing::debug!(
            apis = %self.api_knowledge.display(),
            charts = %self.chart_knowledge.display(),
            "loading knowledge bases"
        );
        Ok(Analyzer::from_files(&self.api_knowledge, &self.chart_knowledge)?)
    }

    pub fn inventory_store(&self) -> Result<FileInventoryStore> {
        Ok(FileInventoryStore::new(&self.inventory_dir)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_overrides() {
        let settings = Settings::from_config(AdvisorConfig::default(), &GlobalOptions::default());
        assert_eq!(
            settings.api_knowledge,
            PathBuf::from("knowledge-base/apis.json")
        );
        assert_eq!(
            settings.inventory_dir,
            PathBuf::from(".kubeadvisor/inventory")
        );
        assert_eq!(settings.cluster_id(None), "cluster-1");
        assert_eq!(settings.cluster_id(Some("prod")), "prod");
    }

    #[test]
    fn test_flags_override_config() {
        let config = AdvisorConfig {
            api_knowledge_path: PathBuf::from("/etc/kb/apis.json"),
            chart_knowledge_path: PathBuf::from("/etc/kb/charts.json"),
            ..AdvisorConfig::default()
        };
        let options = GlobalOptions {
            api_knowledge: Some(PathBuf::from("local-apis.json")),
            ..GlobalOptions::default()
        };

        let settings = Settings::from_config(config, &options);
        assert_eq!(settings.api_knowledge, PathBuf::from("local-apis.json"));
        assert_eq!(
            settings.chart_knowledge,
            PathBuf::from("/etc/kb/charts.json")
        );
    }

    #[test]
    fn test_resolve_from_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "defaultCluster: staging\ninventoryDir: /var/lib/inv\n",
        )
        .unwrap();

        let options = GlobalOptions {
            config: Some(path),
            ..GlobalOptions::default()
        };
        let settings = Settings::resolve(&options).unwrap();
        assert_eq!(settings.default_cluster, "staging");
        assert_eq!(settings.inventory_dir, PathBuf::from("/var/lib/inv"));
    }

    #[test]
    fn test_resolve_missing_config_file_fails() {
        let options = GlobalOptions {
            config: Some(PathBuf::from("/nonexistent/kubeadvisor.yaml")),
            ..GlobalOptions::default()
        };
        assert!(Settings::resolve(&options).is_err());
    }
}
