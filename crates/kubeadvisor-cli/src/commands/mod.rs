//! CLI commands

pub mod impact;
pub mod list;
pub mod plan;
pub mod scan;

use kubeadvisor_core::KubeVersion;

use crate::error::{CliError, Result};

/// Reject version strings that do not parse to a usable `major.minor`
pub(crate) fn require_version(version: &str, flag: &str) -> Result<KubeVersion> {
    let parsed = KubeVersion::parse(version);
    if parsed == KubeVersion::default() {
        return Err(CliError::input_with_help(
            format!("{} '{}' is not a Kubernetes version", flag, version),
            "use a version such as 1.25 or v1.25.3",
        ));
    }
    Ok(parsed)
}
