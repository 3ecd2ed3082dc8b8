//! Config-data key validation.

use nodeconf_model::{ConfigData, Definitions, ADDRESS_YAML_KEY, MODEL_INFO_KEYS};

use crate::error::BuildError;

/// Reject any top-level config-data key that is not a definitions key, a
/// model-info key, or the reserved agent address file.
///
/// All offending keys are reported in one error, naming the target product
/// version. Valid data passes through unchanged.
pub fn validate_config_keys(
    definitions: &Definitions,
    version: &str,
    data: ConfigData,
) -> Result<ConfigData, BuildError> {
    let invalid: Vec<String> = data
        .keys()
        .filter(|key| {
            !definitions.contains(key)
                && !MODEL_INFO_KEYS.contains(&key.as_str())
                && key.as_str() != ADDRESS_YAML_KEY
        })
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(data)
    } else {
        Err(BuildError::InvalidConfigKeys {
            keys: invalid,
            version: version.to_string(),
        })
    }
}
