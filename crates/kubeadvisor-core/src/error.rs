//! Core error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read knowledge base {path}: {source}")]
    KnowledgeBaseRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse knowledge base {path}: {source}")]
    KnowledgeBaseParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cluster not found: {id}")]
    ClusterNotFound { id: String },

    #[error("Invalid cluster id '{id}': must be non-empty and contain no path separators")]
    InvalidClusterId { id: String },

    #[error("Invalid inventory snapshot {path}: {message}")]
    InvalidInventory { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether this error comes from loading a knowledge base
    pub fn is_knowledge_base_error(&self) -> bool {
        matches!(
            self,
            CoreError::KnowledgeBaseRead { .. } | CoreError::KnowledgeBaseParse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
