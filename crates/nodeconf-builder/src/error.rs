//! Build pipeline errors.

use thiserror::Error;

/// Failure raised by the build pipeline.
///
/// Validation is the only stage that can fail; every later stage assumes
/// structurally valid, pre-validated input. No partial output is returned
/// on failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Config-data contained top-level keys unknown to the definitions,
    /// model-info, or reserved keys. All offending keys are reported at
    /// once for a single actionable message.
    #[error("invalid config file keys for version {version}: {}", .keys.join(", "))]
    InvalidConfigKeys { keys: Vec<String>, version: String },
}
