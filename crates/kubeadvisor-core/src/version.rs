//! Version comparison
//!
//! Two distinct orderings live here on purpose:
//!
//! - **Kubernetes versions** compare on `(major, minor)` only. Deprecation and
//!   removal windows are published per minor release, so `1.25.0` and `1.25.9`
//!   are the same point for every query in this crate.
//! - **Chart versions** compare numerically on every dot-separated segment,
//!   with missing segments treated as `0`. Pre-release tags are not interpreted.
//!
//! Parsing is permissive: a leading `v` is stripped and any missing or
//! non-numeric component counts as `0`. Nothing here returns an error.

use std::cmp::Ordering;
use std::fmt;

/// A Kubernetes control-plane version reduced to `major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct KubeVersion {
    pub major: u64,
    pub minor: u64,
}

impl KubeVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse a version string such as `1.25`, `v1.25.3` or `1.25.3-gke.100`
    pub fn parse(version: &str) -> Self {
        let mut parts = normalize(version).split('.');
        let major = parts.next().map(parse_component).unwrap_or(0);
        let minor = parts.next().map(parse_component).unwrap_or(0);
        Self { major, minor }
    }
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Strip a single leading `v`
pub fn normalize(version: &str) -> &str {
    let version = version.trim();
    version.strip_prefix('v').unwrap_or(version)
}

fn parse_component(part: &str) -> u64 {
    part.parse().unwrap_or(0)
}

/// Compare two Kubernetes versions on `(major, minor)`
pub fn compare_kube_versions(a: &str, b: &str) -> Ordering {
    KubeVersion::parse(a).cmp(&KubeVersion::parse(b))
}

/// True iff `version` is not older than `floor`
pub fn is_at_least(version: &str, floor: &str) -> bool {
    compare_kube_versions(version, floor) != Ordering::Less
}

/// Compare two chart versions segment by segment
///
/// `25.0.0` > `20.1.9` > `20.1` == `20.1.0`.
pub fn compare_chart_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<u64> = normalize(a).split('.').map(parse_component).collect();
    let right: Vec<u64> = normalize(b).split('.').map(parse_component).collect();

    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Whether two Kubernetes versions fall in the same minor release
pub fn same_minor_version(a: &str, b: &str) -> bool {
    compare_kube_versions(a, b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kube_version() {
        assert_eq!(KubeVersion::parse("1.25"), KubeVersion::new(1, 25));
        assert_eq!(KubeVersion::parse("v1.25.3"), KubeVersion::new(1, 25));
        assert_eq!(
            KubeVersion::parse("1.28.2-gke.100"),
            KubeVersion::new(1, 28)
        );
        assert_eq!(KubeVersion::parse("1"), KubeVersion::new(1, 0));
    }

    #[test]
    fn test_parse_permissive() {
        assert_eq!(KubeVersion::parse(""), KubeVersion::new(0, 0));
        assert_eq!(KubeVersion::parse("latest"), KubeVersion::new(0, 0));
        assert_eq!(KubeVersion::parse("1.x"), KubeVersion::new(1, 0));
    }

    #[test]
    fn test_compare_ignores_patch() {
        assert_eq!(compare_kube_versions("1.25.0", "1.25.9"), Ordering::Equal);
        assert_eq!(compare_kube_versions("v1.25", "1.25.1"), Ordering::Equal);
    }

    #[test]
    fn test_compare_ordering() {
        assert_eq!(compare_kube_versions("1.26", "1.25"), Ordering::Greater);
        assert_eq!(compare_kube_versions("1.9", "1.22"), Ordering::Less);
        assert_eq!(compare_kube_versions("2.0", "1.99"), Ordering::Greater);
    }

    #[test]
    fn test_is_at_least() {
        assert!(is_at_least("1.22", "1.22"));
        assert!(is_at_least("1.25", "1.22"));
        assert!(is_at_least("v1.22.5", "1.22"));
        assert!(!is_at_least("1.21", "1.22"));
        assert!(!is_at_least("", "1.22"));
    }

    #[test]
    fn test_compare_chart_versions() {
        assert_eq!(
            compare_chart_versions("25.0.0", "20.1.9"),
            Ordering::Greater
        );
        assert_eq!(compare_chart_versions("4.10.0", "4.9.3"), Ordering::Greater);
        assert_eq!(compare_chart_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_chart_versions("v1.2.3", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_chart_versions("1.2.3", "1.2.4"), Ordering::Less);
    }

    #[test]
    fn test_chart_and_kube_orderings_differ() {
        // Patch matters for charts, not for clusters
        assert_eq!(
            compare_chart_versions("1.25.1", "1.25.0"),
            Ordering::Greater
        );
        assert_eq!(compare_kube_versions("1.25.1", "1.25.0"), Ordering::Equal);
    }

    #[test]
    fn test_same_minor_version() {
        assert!(same_minor_version("v1.25", "1.25"));
        assert!(same_minor_version("1.25", "v1.25.3"));
        assert!(!same_minor_version("1.25", "1.26.0"));
    }
}
