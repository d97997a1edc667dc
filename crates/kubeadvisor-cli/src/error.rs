//! CLI error types with exit code handling

use miette::Diagnostic;
use thiserror::Error;

use kubeadvisor_analysis::AnalysisError;
use kubeadvisor_core::CoreError;
use kubeadvisor_planner::PlanError;

use crate::exit_codes;

/// CLI error type carrying an exit code
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid user input
    #[error("Invalid input: {message}")]
    #[diagnostic(code(kubeadvisor::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A knowledge base could not be read or parsed
    #[error("Knowledge base error: {message}")]
    #[diagnostic(
        code(kubeadvisor::cli::knowledge_base),
        help("check --api-knowledge / --chart-knowledge or the paths in your config file")
    )]
    KnowledgeBase { message: String },

    /// Configuration file could not be loaded
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kubeadvisor::cli::config))]
    Config { message: String },

    /// No inventory snapshot for the cluster
    #[error("Cluster '{id}' not found in inventory")]
    #[diagnostic(
        code(kubeadvisor::cli::cluster_not_found),
        help("run `kubeadvisor scan --cluster {id}` first; `kubeadvisor list` shows known clusters")
    )]
    ClusterNotFound { id: String },

    /// Plan generation failed
    #[error("Planning failed: {message}")]
    #[diagnostic(code(kubeadvisor::cli::plan))]
    Plan { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubeadvisor::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough
    #[error("{message}")]
    #[diagnostic(code(kubeadvisor::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::KnowledgeBase { .. } | CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::ClusterNotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Plan { .. } => exit_codes::PLAN_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClusterNotFound { id } => CliError::ClusterNotFound { id },
            e @ CoreError::InvalidClusterId { .. } => CliError::input(e.to_string()),
            e if e.is_knowledge_base_error() => CliError::KnowledgeBase {
                message: e.to_string(),
            },
            CoreError::InvalidConfig { message } => CliError::Config { message },
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            e => CliError::Other {
                message: e.to_string(),
            },
        }
    }
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::ClusterNotFound { id } => CliError::ClusterNotFound { id },
            AnalysisError::KnowledgeBase(e) => CliError::KnowledgeBase {
                message: e.to_string(),
            },
            AnalysisError::Inventory(e) => e.into(),
        }
    }
}

impl From<PlanError> for CliError {
    fn from(err: PlanError) -> Self {
        CliError::Plan {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other {
            message: format!("failed to serialize output: {}", err),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
