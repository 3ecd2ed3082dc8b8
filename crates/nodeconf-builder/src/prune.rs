//! Unmanaged-file and install-type pruning.

use nodeconf_model::{ConfigData, InstallOptions};
use serde_json::Value;
use tracing::debug;

use crate::enrich::{DATASTAX_ENV_SH, DSE_DEFAULT};

/// Remove every config file the operator opted out of managing.
///
/// The toggle for key `k` is the boolean field `manage-{k}` inside `k`'s own
/// field map; only present-and-`false` removes the file. Each file's toggle
/// controls its own presence only.
pub fn prune_unmanaged(mut data: ConfigData) -> ConfigData {
    let unmanaged: Vec<String> = data
        .iter()
        .filter(|(key, fields)| {
            fields.get(manage_toggle(key).as_str()) == Some(&Value::Bool(false))
        })
        .map(|(key, _)| key.clone())
        .collect();

    for key in unmanaged {
        debug!(%key, "removing unmanaged config file");
        data.remove(&key);
    }
    data
}

/// Remove the config file inapplicable to the install type: tarball installs
/// drop the package-only defaults file, package installs drop the
/// tarball-only environment script. Exactly one of the two is dropped.
pub fn prune_by_install_type(install: &InstallOptions, mut data: ConfigData) -> ConfigData {
    let dropped = if install.is_tarball() {
        DSE_DEFAULT
    } else {
        DATASTAX_ENV_SH
    };
    if data.remove(dropped).is_some() {
        debug!(key = dropped, "removed config file inapplicable to install type");
    }
    data
}

fn manage_toggle(key: &str) -> String {
    format!("manage-{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeconf_model::InstallType;
    use serde_json::json;

    fn data(json: serde_json::Value) -> ConfigData {
        json.as_object().unwrap().clone()
    }

    fn install(install_type: InstallType) -> InstallOptions {
        InstallOptions {
            install_type,
            ..Default::default()
        }
    }

    #[test]
    fn removes_files_toggled_off() {
        let input = data(json!({
            "logback-xml": { "manage-logback-xml": false, "pattern": "%msg" },
            "cassandra-yaml": { "manage-cassandra-yaml": true },
        }));
        let out = prune_unmanaged(input);
        assert!(!out.contains_key("logback-xml"));
        assert!(out.contains_key("cassandra-yaml"));
    }

    #[test]
    fn absent_toggle_means_managed() {
        let input = data(json!({ "cassandra-yaml": { "cluster_name": "c1" } }));
        let out = prune_unmanaged(input);
        assert!(out.contains_key("cassandra-yaml"));
    }

    #[test]
    fn install_type_pruning_is_exclusive() {
        let input = data(json!({
            "dse-default": {},
            "datastax-env-sh": {},
            "cassandra-yaml": {},
        }));

        let package = prune_by_install_type(&install(InstallType::Package), input.clone());
        assert!(package.contains_key("dse-default"));
        assert!(!package.contains_key("datastax-env-sh"));

        let tarball = prune_by_install_type(&install(InstallType::Tarball), input);
        assert!(!tarball.contains_key("dse-default"));
        assert!(tarball.contains_key("datastax-env-sh"));
    }
}
