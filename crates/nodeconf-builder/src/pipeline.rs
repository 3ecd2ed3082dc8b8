//! The end-to-end build pipeline.

use nodeconf_model::{
    ConfigData, Definitions, InstallOptions, ModelInfo, VersionCompare, MODEL_INFO_KEYS,
};
use std::borrow::Cow;
use tracing::{debug, info};

use crate::defaults::fill_defaults;
use crate::enrich::enrich;
use crate::error::BuildError;
use crate::paths::{generate_file_path, qualify_paths};
use crate::prune::{prune_by_install_type, prune_unmanaged};
use crate::record::record_configured_paths;
use crate::validate::validate_config_keys;

/// Read-only context shared by every pipeline stage.
pub struct BuildContext<'a> {
    pub product: &'a str,
    pub version: &'a str,
    pub install: &'a InstallOptions,
    pub definitions: &'a Definitions,
    pub versions: &'a dyn VersionCompare,
}

/// Run the full transform over one node's config-data.
///
/// Stages: tarball-default substitution → model-info merge → key validation
/// → default filling → unmanaged-file pruning → install-type pruning → per
/// config-file key (in sorted order): enrich → generate file path → record
/// configured paths → qualify paths.
///
/// The per-key order matters: enrichment may introduce or change the very
/// field values the path stages inspect. On validation failure nothing
/// downstream runs and no partial output is returned.
pub fn build_config(
    definitions: &Definitions,
    model: &ModelInfo,
    install: &InstallOptions,
    versions: &dyn VersionCompare,
    mut data: ConfigData,
) -> Result<ConfigData, BuildError> {
    let definitions: Cow<'_, Definitions> = if install.is_tarball() {
        Cow::Owned(definitions.with_tarball_defaults())
    } else {
        Cow::Borrowed(definitions)
    };
    let ctx = BuildContext {
        product: &model.product,
        version: &model.version,
        install,
        definitions: &definitions,
        versions,
    };

    model.merge_into(&mut data);
    debug!(product = ctx.product, version = ctx.version, "validating config keys");
    let data = validate_config_keys(ctx.definitions, ctx.version, data)?;
    debug!("filling schema defaults");
    let data = fill_defaults(ctx.definitions, data);
    let data = prune_unmanaged(data);
    let data = prune_by_install_type(install, data);

    let keys: Vec<String> = data
        .keys()
        .filter(|key| !MODEL_INFO_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();
    let data = keys.iter().fold(data, |data, key| {
        debug!(%key, "building config file");
        let data = enrich(&ctx, key, data);
        let data = generate_file_path(&ctx, key, data);
        let data = record_configured_paths(&ctx, key, data);
        qualify_paths(&ctx, key, data)
    });

    info!(
        files = keys.len(),
        product = ctx.product,
        version = ctx.version,
        "node configuration built"
    );
    Ok(data)
}
