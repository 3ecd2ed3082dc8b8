//! The per-product config definitions tree.
//!
//! Definitions arrive parsed from the external registry (they are YAML
//! documents upstream) and are read-only once handed to the pipeline. Each
//! config-file key maps to a [`FileDefinition`]: display name, on-disk path
//! per install type, and a field tree carrying defaults and path flags.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// All config-file definitions for one product/version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions {
    pub files: BTreeMap<String, FileDefinition>,
}

impl Definitions {
    pub fn get(&self, key: &str) -> Option<&FileDefinition> {
        self.files.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    /// A copy where every field declaring a tarball default has it promoted
    /// to the effective default. Run before default filling on tarball
    /// installs so the filler never branches on install type.
    pub fn with_tarball_defaults(&self) -> Definitions {
        let mut defs = self.clone();
        for file in defs.files.values_mut() {
            promote_tarball_defaults(&mut file.fields);
        }
        defs
    }
}

/// Schema for one logical config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileDefinition {
    /// Rendered file name, e.g. `cassandra.yaml`. Owning-file label on
    /// configured-path records.
    pub display_name: String,
    /// Absolute on-disk path for package installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
    /// Path relative to the unpacked product directory for tarball installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldDef>,
}

impl FileDefinition {
    /// Property paths of every field flagged as a file or directory,
    /// including fields nested under dict nodes.
    pub fn path_fields(&self) -> Vec<PathField> {
        let mut out = Vec::new();
        collect_path_fields(&self.fields, &mut Vec::new(), &mut out);
        out
    }
}

/// One node in a config file's field tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDef {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Overrides `default` on tarball installs (typically a relative path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_file: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_directory: bool,
    /// Child fields for `dict` nodes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldDef>,
}

/// Field type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    List,
    Dict,
}

/// A file/directory-flagged property path yielded by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathField {
    pub path: Vec<String>,
    pub directory: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn collect_path_fields(
    fields: &BTreeMap<String, FieldDef>,
    prefix: &mut Vec<String>,
    out: &mut Vec<PathField>,
) {
    for (name, field) in fields {
        prefix.push(name.clone());
        if field.is_file || field.is_directory {
            out.push(PathField {
                path: prefix.clone(),
                directory: field.is_directory,
            });
        }
        if !field.fields.is_empty() {
            collect_path_fields(&field.fields, prefix, out);
        }
        prefix.pop();
    }
}

fn promote_tarball_defaults(fields: &mut BTreeMap<String, FieldDef>) {
    for field in fields.values_mut() {
        if field.tarball_default.is_some() {
            field.default = field.tarball_default.clone();
        }
        promote_tarball_defaults(&mut field.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Definitions {
        serde_yaml::from_str(
            r#"
cassandra-yaml:
  display-name: cassandra.yaml
  package-path: /etc/dse/cassandra/cassandra.yaml
  tarball-path: resources/cassandra/conf/cassandra.yaml
  fields:
    cluster_name:
      type: scalar
      default: Test Cluster
    data_file_directories:
      type: list
      is-directory: true
      default: [/var/lib/cassandra/data]
      tarball-default: [data]
    client_encryption_options:
      type: dict
      fields:
        enabled:
          type: scalar
          default: false
        keystore:
          type: scalar
          is-file: true
          default: conf/.keystore
"#,
        )
        .unwrap()
    }

    #[test]
    fn classifier_finds_nested_path_fields() {
        let defs = defs();
        let fields = defs.get("cassandra-yaml").unwrap().path_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].path, vec!["client_encryption_options", "keystore"]);
        assert!(!fields[0].directory);
        assert_eq!(fields[1].path, vec!["data_file_directories"]);
        assert!(fields[1].directory);
    }

    #[test]
    fn tarball_substitution_promotes_declared_defaults_only() {
        let defs = defs().with_tarball_defaults();
        let fields = &defs.get("cassandra-yaml").unwrap().fields;
        assert_eq!(
            fields["data_file_directories"].default,
            Some(serde_json::json!(["data"]))
        );
        // No tarball default declared: untouched.
        assert_eq!(
            fields["cluster_name"].default,
            Some(serde_json::json!("Test Cluster"))
        );
    }

    #[test]
    fn field_kind_defaults_to_scalar() {
        let field: FieldDef = serde_yaml::from_str("default: 7199").unwrap();
        assert_eq!(field.kind, FieldKind::Scalar);
        assert_eq!(field.default, Some(serde_json::json!(7199)));
    }
}
