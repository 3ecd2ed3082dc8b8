//! On-disk file-path generation and tarball path qualification.

use nodeconf_model::{ConfigData, ADDRESS_YAML_KEY, NODE_INFO_KEY};
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

use crate::enrich::resolve_install_directory;
use crate::pipeline::BuildContext;

/// Fixed agent address file location for package installs.
const ADDRESS_YAML_PACKAGE_PATH: &str = "/var/lib/datastax-agent/conf/address.yaml";

/// Agent address file location relative to the install dir for tarballs.
const ADDRESS_YAML_TARBALL_PATH: &str = "datastax-agent/conf/address.yaml";

/// Compute the absolute on-disk path for `key` and record it into
/// `node-info.file-paths`. Files whose schema defines no path of the
/// applicable kind are silently skipped.
pub fn generate_file_path(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    if let Some(path) = config_file_path(ctx, key, &data) {
        debug!(%key, %path, "resolved config file path");
        if let Some(file_paths) = data
            .get_mut(NODE_INFO_KEY)
            .and_then(|node| node.get_mut("file-paths"))
            .and_then(Value::as_object_mut)
        {
            file_paths.insert(key.to_string(), json!(path));
        }
    }
    data
}

fn config_file_path(ctx: &BuildContext, key: &str, data: &ConfigData) -> Option<String> {
    if key == ADDRESS_YAML_KEY {
        return if ctx.install.is_tarball() {
            let dir = resolve_install_directory(ctx.install, data)?;
            Some(join(&dir, ADDRESS_YAML_TARBALL_PATH))
        } else {
            Some(ADDRESS_YAML_PACKAGE_PATH.to_string())
        };
    }

    let file = ctx.definitions.get(key)?;
    if ctx.install.is_tarball() {
        let relative = file.tarball_path.as_deref()?;
        let dir = resolve_install_directory(ctx.install, data)?;
        let product_dir = format!("{}-{}", ctx.product, ctx.version);
        Some(join(&join(&dir, &product_dir), relative))
    } else {
        file.package_path.clone()
    }
}

/// Rewrite every path-classified leaf under `key` to an absolute path.
/// Only active for tarball installs; a no-op when the schema has no
/// path-flagged fields. Idempotent: absolute values pass through unchanged.
pub fn qualify_paths(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    if !ctx.install.is_tarball() {
        return data;
    }
    let Some(file) = ctx.definitions.get(key) else {
        return data;
    };
    let path_fields = file.path_fields();
    if path_fields.is_empty() {
        return data;
    }
    let Some(dir) = resolve_install_directory(ctx.install, &data) else {
        return data;
    };

    if let Some(entry) = data.get_mut(key) {
        for field in &path_fields {
            if let Some(leaf) = value_at_path_mut(entry, &field.path) {
                qualify_value(&dir, leaf);
            }
        }
    }
    data
}

/// Prefix `dir` onto a relative path value; already-absolute values are
/// returned unchanged.
pub(crate) fn qualify_str(dir: &str, value: &str) -> String {
    if Path::new(value).is_absolute() {
        value.to_string()
    } else {
        join(dir, value)
    }
}

pub(crate) fn value_at_path<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

fn value_at_path_mut<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in path {
        current = current.get_mut(segment)?;
    }
    Some(current)
}

fn qualify_value(dir: &str, value: &mut Value) {
    match value {
        Value::String(s) => *s = qualify_str(dir, s),
        Value::Array(items) => {
            for item in items {
                qualify_value(dir, item);
            }
        }
        _ => {}
    }
}

fn join(dir: &str, rest: &str) -> String {
    Path::new(dir).join(rest).to_string_lossy().into_owned()
}
