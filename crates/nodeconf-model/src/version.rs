//! Version comparison seam.
//!
//! The pipeline never parses version strings itself; every version-gated
//! branch goes through [`VersionCompare`]. The embedding system may plug in
//! its own scheme; [`DottedVersions`] is the batteries-included default.

/// "Is `version` at least `minimum`" — the only version capability the
/// build pipeline uses.
pub trait VersionCompare {
    fn at_least(&self, version: &str, minimum: &str) -> bool;
}

/// Numeric dotted-segment comparator: `6.8.4 >= 6.8`, `5.1 < 6.0`.
/// Non-numeric segments compare as zero; trailing zero segments are
/// insignificant (`6.8.0 == 6.8`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedVersions;

impl VersionCompare for DottedVersions {
    fn at_least(&self, version: &str, minimum: &str) -> bool {
        segments(version) >= segments(minimum)
    }
}

fn segments(version: &str) -> Vec<u64> {
    let mut parts: Vec<u64> = version
        .split('.')
        .map(|s| s.trim().parse().unwrap_or(0))
        .collect();
    while parts.last() == Some(&0) {
        parts.pop();
    }
    parts
}
