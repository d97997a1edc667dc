//! Knowledge bases
//!
//! Both knowledge bases are loaded once and are read-only afterwards, so a
//! single instance can be shared across concurrent analyses.
//!
//! Absence of data is never an error. A GVK or chart the knowledge base does
//! not know about is treated as compatible; the catalogue is necessarily
//! incomplete and must not block an upgrade on missing entries.

mod apis;
mod charts;

pub use apis::{ApiDeprecation, ApiKnowledgeBase, ApiKnowledgeData, GvkKey};
pub use charts::{
    ChartCompatibility, ChartInfo, ChartKnowledgeBase, ChartKnowledgeData, ChartRecommendation,
};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CoreError, Result};

/// Read and deserialize a JSON knowledge-base file
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::KnowledgeBaseRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CoreError::KnowledgeBaseParse {
        path: path.to_path_buf(),
        source,
    })
}
