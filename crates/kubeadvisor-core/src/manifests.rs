//! Local manifest scanning
//!
//! Walks a directory of Kubernetes YAML manifests and extracts the API
//! surfaces they use. CustomResourceDefinition documents also yield the CRD
//! itself with its served versions.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use walkdir::WalkDir;

use crate::error::Result;
use crate::inventory::{ClusterInventory, CrdEntry, ManifestApi};

/// Directory names never descended into
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[".git", "node_modules", "vendor", ".terraform"];

/// Split `apiVersion` into `(group, version)`
///
/// ```
/// use kubeadvisor_core::parse_api_version;
///
/// assert_eq!(parse_api_version("apps/v1"), ("apps", "v1"));
/// assert_eq!(parse_api_version("v1"), ("", "v1"));
/// ```
pub fn parse_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// What a scan found
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files_scanned: usize,
    pub resources_found: usize,
    /// Files that could not be read or parsed
    pub skipped_files: Vec<PathBuf>,
    pub apis: Vec<ManifestApi>,
    pub crds: Vec<CrdEntry>,
}

impl ScanResult {
    /// Merge everything found into an inventory
    pub fn apply_to(&self, inventory: &mut ClusterInventory) {
        for api in &self.apis {
            inventory.record_manifest_api(api.clone());
        }
        for crd in &self.crds {
            inventory.record_crd(crd.clone());
        }
    }

    fn record_api(&mut self, api: ManifestApi) {
        let existing = self
            .apis
            .iter_mut()
            .find(|a| a.group == api.group && a.version == api.version && a.kind == api.kind);
        match existing {
            Some(existing) => existing.count += 1,
            None => self.apis.push(api),
        }
    }
}

/// Manifest directory scanner
#[derive(Debug, Clone)]
pub struct ManifestScanner {
    ignored_dirs: Vec<String>,
}

impl Default for ManifestScanner {
    fn default() -> Self {
        Self {
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ManifestScanner {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|d| d == name)
    }

    /// Recursively scan every `.yaml`/`.yml` file under `root`
    pub fn scan_dir(&self, root: &Path) -> Result<ScanResult> {
        let mut result = ScanResult::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && e.depth() > 0
                    && self.is_ignored(&e.file_name().to_string_lossy()))
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                std::io::Error::other(format!("failed to walk {}: {}", root.display(), e))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_yaml_file(path) {
                continue;
            }

            result.files_scanned += 1;
            let documents = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|content| parse_documents(&content).map_err(|e| e.to_string()));
            match documents {
                Ok(documents) => record_documents(&documents, &mut result),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    result.skipped_files.push(path.to_path_buf());
                }
            }
        }

        tracing::info!(
            files = result.files_scanned,
            resources = result.resources_found,
            apis = result.apis.len(),
            crds = result.crds.len(),
            "manifest scan complete"
        );
        Ok(result)
    }

    /// Scan a single (possibly multi-document) YAML string
    pub fn scan_str(&self, content: &str) -> Result<ScanResult> {
        let mut result = ScanResult::default();
        record_documents(&parse_documents(content)?, &mut result);
        Ok(result)
    }
}

/// Split a YAML stream into documents; any malformed document fails the whole stream
fn parse_documents(content: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        documents.push(Value::deserialize(document)?);
    }
    Ok(documents)
}

fn record_documents(documents: &[Value], result: &mut ScanResult) {
    for value in documents {
        let api_version = value.get("apiVersion").and_then(Value::as_str);
        let kind = value.get("kind").and_then(Value::as_str);
        let (Some(api_version), Some(kind)) = (api_version, kind) else {
            continue;
        };
        if api_version.is_empty() || kind.is_empty() {
            continue;
        }

        result.resources_found += 1;
        let (group, version) = parse_api_version(api_version);
        result.record_api(ManifestApi::new(group, version, kind));

        if kind == "CustomResourceDefinition"
            && let Some(crd) = crd_from_value(value)
        {
            result.crds.push(crd);
        }
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Extract a CRD entry from a CustomResourceDefinition document
fn crd_from_value(value: &Value) -> Option<CrdEntry> {
    let name = value.get("metadata")?.get("name")?.as_str()?;
    let spec = value.get("spec")?;
    let group = spec.get("group")?.as_str()?;
    let kind = spec.get("names")?.get("kind")?.as_str()?;

    let served_versions = spec
        .get("versions")
        .and_then(Value::as_sequence)
        .map(|versions| {
            versions
                .iter()
                .filter(|v| v.get("served").and_then(Value::as_bool).unwrap_or(true))
                .filter_map(|v| v.get("name").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Some(CrdEntry {
        name: name.to_string(),
        group: group.to_string(),
        kind: kind.to_string(),
        served_versions,
    })
}
