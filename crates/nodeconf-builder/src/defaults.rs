//! Schema default filling.
//!
//! For every config-file key the definitions know, the filler materializes
//! the key and merges the user's values over the schema defaults, user
//! wins, recursing into dict fields. Install-type differences are already
//! folded into the definitions (`Definitions::with_tarball_defaults`), so
//! this stage never branches on install type.

use nodeconf_model::{ConfigData, Definitions, FieldDef, FieldKind};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fill schema defaults for every definitions key. Idempotent.
pub fn fill_defaults(definitions: &Definitions, mut data: ConfigData) -> ConfigData {
    for (key, file) in &definitions.files {
        let mut filled = Value::Object(defaults_tree(&file.fields));
        if let Some(user) = data.remove(key.as_str()) {
            overlay(&mut filled, user);
        }
        data.insert(key.clone(), filled);
    }
    data
}

/// The default value tree for one file's field schema. Dict fields with no
/// whole-value default contribute their children's defaults.
fn defaults_tree(fields: &BTreeMap<String, FieldDef>) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, field) in fields {
        if let Some(default) = &field.default {
            out.insert(name.clone(), default.clone());
        } else if field.kind == FieldKind::Dict {
            let children = defaults_tree(&field.fields);
            if !children.is_empty() {
                out.insert(name.clone(), Value::Object(children));
            }
        }
    }
    out
}

/// Deep-merge `user` over `base`: nested objects merge recursively, any
/// other user value replaces the default entirely (including lists).
fn overlay(base: &mut Value, user: Value) {
    match (base, user) {
        (Value::Object(base_map), Value::Object(user_map)) => {
            for (key, value) in user_map {
                match base_map.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
