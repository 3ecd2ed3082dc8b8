//! Configured-path records: which resolved values are filesystem paths and
//! whether they deviate from the schema defaults.

use nodeconf_model::{ConfigData, ConfiguredPath, FieldDef, NODE_INFO_KEY};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::enrich::resolve_install_directory;
use crate::paths::{qualify_str, value_at_path};
use crate::pipeline::BuildContext;

/// Record one `ConfiguredPath` per resolved path-like value under `key`,
/// appending onto `node-info.configured-paths`.
///
/// Default and actual values are both fully qualified under tarball installs
/// before comparison; a value is `custom` iff it is absent from the schema's
/// default set. List-valued fields compare as sets: duplicates collapse and
/// ordering is not significant.
pub fn record_configured_paths(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let Some(file) = ctx.definitions.get(key) else {
        return data;
    };
    let path_fields = file.path_fields();
    if path_fields.is_empty() {
        return data;
    }

    let install_dir = if ctx.install.is_tarball() {
        resolve_install_directory(ctx.install, &data)
    } else {
        None
    };
    let qualify = |value: &str| match &install_dir {
        Some(dir) => qualify_str(dir, value),
        None => value.to_string(),
    };

    let mut records = Vec::new();
    if let Some(entry) = data.get(key) {
        for field in &path_fields {
            let defaults: BTreeSet<String> = field_default(&file.fields, &field.path)
                .map(value_strings)
                .unwrap_or_default()
                .iter()
                .map(|value| qualify(value))
                .collect();
            let actuals = value_at_path(entry, &field.path)
                .map(value_strings)
                .unwrap_or_default();
            for actual in actuals {
                let actual = qualify(&actual);
                records.push(ConfiguredPath {
                    file: file.display_name.clone(),
                    path: field.path.clone(),
                    custom: !defaults.contains(&actual),
                    directory: field.directory,
                    value: actual,
                });
            }
        }
    }

    if records.is_empty() {
        return data;
    }
    if let Some(list) = data
        .get_mut(NODE_INFO_KEY)
        .and_then(|node| node.get_mut("configured-paths"))
        .and_then(Value::as_array_mut)
    {
        for record in records {
            list.push(json!({
                "file": record.file,
                "path": record.path,
                "value": record.value,
                "custom": record.custom,
                "directory": record.directory,
            }));
        }
    }
    data
}

/// The schema default declared at `path` in the field tree, if any.
fn field_default<'a>(fields: &'a BTreeMap<String, FieldDef>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let field = fields.get(first)?;
    if rest.is_empty() {
        field.default.as_ref()
    } else {
        field_default(&field.fields, rest)
    }
}

/// A scalar string contributes itself; a list contributes its string
/// elements; anything else contributes nothing.
fn value_strings(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
