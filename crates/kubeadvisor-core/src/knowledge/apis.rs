//! API deprecation knowledge base

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::read_json;
use crate::error::Result;
use crate::version::is_at_least;

/// Deprecation information for one Kubernetes API surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeprecation {
    /// API group (`""` for the core group)
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
    /// First Kubernetes version that deprecates this API
    pub deprecated_in: String,
    /// First Kubernetes version that no longer serves this API
    pub removed_in: String,
    /// Successor API, e.g. `networking.k8s.io/v1 Ingress`
    #[serde(rename = "replacementAPI", default)]
    pub replacement_api: String,
    #[serde(default)]
    pub migration_notes: String,
}

impl ApiDeprecation {
    pub fn key(&self) -> GvkKey {
        GvkKey::new(&self.group, &self.version, &self.kind)
    }
}

/// On-disk layout of `apis.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKnowledgeData {
    #[serde(default)]
    pub deprecations: Vec<ApiDeprecation>,
}

/// Exact `(group, version, kind)` lookup key
///
/// The empty group is the core API group and is a regular key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GvkKey {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GvkKey {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }
}

impl fmt::Display for GvkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.version, self.kind)
    }
}

/// In-memory index of API deprecations
#[derive(Debug, Clone, Default)]
pub struct ApiKnowledgeBase {
    deprecations: HashMap<GvkKey, ApiDeprecation>,
    records: Vec<ApiDeprecation>,
}

impl ApiKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a knowledge base from already materialized records
    pub fn load(records: impl IntoIterator<Item = ApiDeprecation>) -> Self {
        let mut kb = Self::new();
        for record in records {
            kb.insert(record);
        }
        kb
    }

    /// Load `apis.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let data: ApiKnowledgeData = read_json(path)?;
        let kb = Self::load(data.deprecations);
        tracing::debug!(
            path = %path.display(),
            records = kb.len(),
            "loaded API knowledge base"
        );
        Ok(kb)
    }

    /// Index a record; a later record with the same key replaces the earlier one
    pub fn insert(&mut self, record: ApiDeprecation) {
        self.deprecations.insert(record.key(), record.clone());
        self.records.push(record);
    }

    /// Exact-match lookup
    pub fn lookup(&self, group: &str, version: &str, kind: &str) -> Option<&ApiDeprecation> {
        self.deprecations.get(&GvkKey::new(group, version, kind))
    }

    /// Whether the API is no longer served at `target_version`
    pub fn is_removed_at_or_after(
        &self,
        group: &str,
        version: &str,
        kind: &str,
        target_version: &str,
    ) -> bool {
        self.lookup(group, version, kind)
            .is_some_and(|dep| is_at_least(target_version, &dep.removed_in))
    }

    /// Whether the API is deprecated at `target_version` but still served
    pub fn is_deprecated_but_not_removed(
        &self,
        group: &str,
        version: &str,
        kind: &str,
        target_version: &str,
    ) -> bool {
        self.lookup(group, version, kind).is_some_and(|dep| {
            is_at_least(target_version, &dep.deprecated_in)
                && !is_at_least(target_version, &dep.removed_in)
        })
    }

    pub fn removal_version(&self, group: &str, version: &str, kind: &str) -> Option<&str> {
        self.lookup(group, version, kind)
            .map(|dep| dep.removed_in.as_str())
    }

    pub fn replacement_api(&self, group: &str, version: &str, kind: &str) -> Option<&str> {
        self.lookup(group, version, kind)
            .map(|dep| dep.replacement_api.as_str())
    }

    /// All loaded records, in load order
    pub fn all(&self) -> &[ApiDeprecation] {
        &self.records
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.deprecations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deprecations.is_empty()
    }
}
