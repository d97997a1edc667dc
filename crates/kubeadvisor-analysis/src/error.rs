//! Error types for impact analysis

use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A knowledge base could not be loaded
    #[error("failed to load knowledge base: {0}")]
    KnowledgeBase(#[source] kubeadvisor_core::CoreError),

    /// The requested cluster is not in the inventory
    #[error("cluster '{id}' not found in inventory")]
    ClusterNotFound { id: String },

    /// Any other inventory failure
    #[error("inventory error: {0}")]
    Inventory(#[source] kubeadvisor_core::CoreError),
}

impl From<kubeadvisor_core::CoreError> for AnalysisError {
    fn from(e: kubeadvisor_core::CoreError) -> Self {
        match e {
            kubeadvisor_core::CoreError::ClusterNotFound { id } => Self::ClusterNotFound { id },
            e if e.is_knowledge_base_error() => Self::KnowledgeBase(e),
            e => Self::Inventory(e),
        }
    }
}
