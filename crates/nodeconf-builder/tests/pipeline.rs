//! End-to-end pipeline scenarios over a realistic definitions slice.

use nodeconf_builder::{build_config, BuildError};
use nodeconf_model::{
    ClusterInfo, ConfigData, ConfiguredPath, DatacenterInfo, Definitions, DottedVersions,
    InstallOptions, InstallPrivileges, InstallType, ModelInfo, NodeInfo,
};
use serde_json::json;

fn definitions() -> Definitions {
    serde_yaml::from_str(
        r#"
cassandra-yaml:
  display-name: cassandra.yaml
  package-path: /etc/dse/cassandra/cassandra.yaml
  tarball-path: resources/cassandra/conf/cassandra.yaml
  fields:
    cluster_name:
      default: Test Cluster
    num_tokens:
      default: 8
    data_file_directories:
      type: list
      is-directory: true
      default: [/var/lib/cassandra/data]
      tarball-default: [data]
    hints_directory:
      is-directory: true
      default: /var/lib/cassandra/hints
      tarball-default: hints
cassandra-env-sh:
  display-name: cassandra-env.sh
  package-path: /etc/dse/cassandra/cassandra-env.sh
  tarball-path: resources/cassandra/conf/cassandra-env.sh
jvm-options:
  display-name: jvm.options
  package-path: /etc/dse/cassandra/jvm.options
  tarball-path: resources/cassandra/conf/jvm.options
  fields:
    jmx-port:
      default: 7199
jvm-server-options:
  display-name: jvm-server.options
  package-path: /etc/dse/cassandra/jvm-server.options
  tarball-path: resources/cassandra/conf/jvm-server.options
  fields:
    jmx-port:
      default: 7199
dse-default:
  display-name: dse
  package-path: /etc/default/dse
datastax-env-sh:
  display-name: datastax-env.sh
  tarball-path: datastax-env.sh
cassandra-rackdc-properties:
  display-name: cassandra-rackdc.properties
  package-path: /etc/dse/cassandra/cassandra-rackdc.properties
  tarball-path: resources/cassandra/conf/cassandra-rackdc.properties
java-setup:
  display-name: java-setup
  fields:
    manage-java:
      default: true
    java-vendor:
      default: openjdk
logback-xml:
  display-name: logback.xml
  package-path: /etc/dse/cassandra/logback.xml
"#,
    )
    .unwrap()
}

fn model() -> ModelInfo {
    ModelInfo {
        product: "dse".to_string(),
        version: "6.8.4".to_string(),
        cluster: ClusterInfo {
            name: "c1".to_string(),
            seeds: vec!["10.0.0.1".to_string()],
        },
        datacenter: DatacenterInfo {
            name: "dc1".to_string(),
            graph_enabled: true,
            ..Default::default()
        },
        node: NodeInfo {
            name: "node0".to_string(),
            rack: "rack1".to_string(),
            listen_address: "10.0.0.1".to_string(),
            native_transport_address: "10.0.0.1".to_string(),
            ..Default::default()
        },
    }
}

fn package_install() -> InstallOptions {
    InstallOptions {
        install_type: InstallType::Package,
        ..Default::default()
    }
}

fn tarball_install(dir: &str, privileges: InstallPrivileges) -> InstallOptions {
    InstallOptions {
        install_type: InstallType::Tarball,
        install_directory: dir.to_string(),
        install_privileges: privileges,
        ..Default::default()
    }
}

fn data(json: serde_json::Value) -> ConfigData {
    json.as_object().unwrap().clone()
}

fn configured_paths(out: &ConfigData) -> Vec<ConfiguredPath> {
    serde_json::from_value(out["node-info"]["configured-paths"].clone()).unwrap()
}

#[test]
fn package_install_dse_6_8() {
    let defs = definitions();
    let input = data(json!({
        "cassandra-yaml": { "num_tokens": 16 },
        "jvm-server-options": { "jmx-port": 7299 },
        "address-yaml": {},
    }));

    let out = build_config(&defs, &model(), &package_install(), &DottedVersions, input).unwrap();

    // Primary database config: topology-computed fields under current names.
    let yaml = &out["cassandra-yaml"];
    assert_eq!(yaml["cluster_name"], "c1");
    assert_eq!(yaml["native_transport_address"], "10.0.0.1");
    assert!(yaml.get("rpc_address").is_none());
    assert_eq!(
        yaml["seed_provider"][0]["class_name"],
        "org.apache.cassandra.locator.SimpleSeedProvider"
    );
    assert_eq!(yaml["seed_provider"][0]["parameters"][0]["seeds"], "10.0.0.1");

    // User override kept, untouched defaults filled.
    assert_eq!(yaml["num_tokens"], 16);
    assert_eq!(yaml["data_file_directories"], json!(["/var/lib/cassandra/data"]));

    // JMX port from the server option set at 6.8.
    assert_eq!(out["cassandra-env-sh"]["jmx-port"], 7299);

    // Package-only file enriched; tarball-only file pruned.
    let dse_default = &out["dse-default"];
    assert_eq!(dse_default["graph-enabled"], 1);
    assert_eq!(dse_default["solr-enabled"], 0);
    assert_eq!(dse_default["cassandra-user"], "cassandra");
    assert_eq!(dse_default["cassandra-group"], "cassandra");
    assert!(!out.contains_key("datastax-env-sh"));

    // Topology properties.
    let rackdc = &out["cassandra-rackdc-properties"];
    assert_eq!(rackdc["dc"], "dc1");
    assert_eq!(rackdc["rack"], "rack1");

    // File paths from the schema's package paths, plus the hard-coded agent
    // address file.
    let file_paths = &out["node-info"]["file-paths"];
    assert_eq!(file_paths["cassandra-yaml"], "/etc/dse/cassandra/cassandra.yaml");
    assert_eq!(file_paths["address-yaml"], "/var/lib/datastax-agent/conf/address.yaml");
    // java-setup defines no on-disk path and is skipped.
    assert!(file_paths.get("java-setup").is_none());

    // Package paths recorded verbatim, default values not custom.
    let records = configured_paths(&out);
    let data_dir = records
        .iter()
        .find(|r| r.value == "/var/lib/cassandra/data")
        .unwrap();
    assert!(!data_dir.custom);
    assert!(data_dir.directory);
    assert_eq!(data_dir.file, "cassandra.yaml");
}

#[test]
fn unknown_keys_fail_before_any_enrichment() {
    let defs = definitions();
    let input = data(json!({
        "cassandra-yaml": {},
        "bogus-yaml": {},
        "zz-unknown": {},
    }));

    let err = build_config(&defs, &model(), &package_install(), &DottedVersions, input)
        .unwrap_err();
    let BuildError::InvalidConfigKeys { keys, version } = err else {
        panic!("wrong error kind");
    };
    assert_eq!(keys, vec!["bogus-yaml", "zz-unknown"]);
    assert_eq!(version, "6.8.4");
}

#[test]
fn tarball_install_resolves_absolute_paths() {
    let defs = definitions();
    let input = data(json!({ "address-yaml": {} }));
    let install = tarball_install("/opt/dse", InstallPrivileges::Root);

    let out = build_config(&defs, &model(), &install, &DottedVersions, input).unwrap();

    // Tarball defaults substituted, then qualified under the install dir.
    let yaml = &out["cassandra-yaml"];
    assert_eq!(yaml["data_file_directories"], json!(["/opt/dse/data"]));
    assert_eq!(yaml["hints_directory"], "/opt/dse/hints");

    // Package-only file pruned; tarball-only file enriched.
    assert!(!out.contains_key("dse-default"));
    let env = &out["datastax-env-sh"];
    assert_eq!(env["manage-java"], true);
    assert_eq!(env["java-vendor"], "openjdk");
    assert_eq!(env["install-directory"], "/opt/dse");

    // File paths join install dir, product dir, and the tarball path.
    let file_paths = &out["node-info"]["file-paths"];
    assert_eq!(
        file_paths["cassandra-yaml"],
        "/opt/dse/dse-6.8.4/resources/cassandra/conf/cassandra.yaml"
    );
    assert_eq!(
        file_paths["address-yaml"],
        "/opt/dse/datastax-agent/conf/address.yaml"
    );
    // No tarball path defined for logback-xml: skipped.
    assert!(file_paths.get("logback-xml").is_none());

    // Substituted defaults still compare as defaults after qualification.
    let records = configured_paths(&out);
    let data_dir = records.iter().find(|r| r.value == "/opt/dse/data").unwrap();
    assert!(!data_dir.custom);

    // Every recorded path ended up absolute.
    assert!(records.iter().all(|r| r.value.starts_with('/')));
}

#[test]
fn tarball_without_root_sets_no_run_as() {
    let defs = definitions();
    let install = tarball_install("/opt/dse", InstallPrivileges::Normal);
    let out = build_config(&defs, &model(), &install, &DottedVersions, ConfigData::new()).unwrap();

    // dse-default is pruned on tarballs, so the run-as decision shows up
    // nowhere; the tarball env script still resolves its install dir.
    assert!(!out.contains_key("dse-default"));
    assert_eq!(out["datastax-env-sh"]["install-directory"], "/opt/dse");
}

#[test]
fn unmanaged_files_never_reach_the_output() {
    let defs = definitions();
    let input = data(json!({
        "logback-xml": { "manage-logback-xml": false },
    }));

    let out = build_config(&defs, &model(), &package_install(), &DottedVersions, input).unwrap();
    assert!(!out.contains_key("logback-xml"));
    assert!(out["node-info"]["file-paths"].get("logback-xml").is_none());
}

#[test]
fn model_info_passes_through_to_the_output() {
    let defs = definitions();
    let out = build_config(
        &defs,
        &model(),
        &package_install(),
        &DottedVersions,
        ConfigData::new(),
    )
    .unwrap();
    assert_eq!(out["cluster-info"]["name"], "c1");
    assert_eq!(out["datacenter-info"]["name"], "dc1");
    assert_eq!(out["node-info"]["rack"], "rack1");
}

#[test]
fn legacy_dse_renames_transport_fields_end_to_end() {
    let defs = definitions();
    let mut model = model();
    model.version = "5.1.17".to_string();

    let out = build_config(
        &defs,
        &model,
        &package_install(),
        &DottedVersions,
        ConfigData::new(),
    )
    .unwrap();
    let yaml = &out["cassandra-yaml"];
    assert_eq!(yaml["rpc_address"], "10.0.0.1");
    assert!(yaml.get("native_transport_address").is_none());
    // JMX comes from the legacy option set below 6.8.
    assert_eq!(out["cassandra-env-sh"]["jmx-port"], 7199);
}
