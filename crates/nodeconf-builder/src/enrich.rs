//! Per-config-file enrichment: version- and topology-aware field synthesis.
//!
//! A registry keyed by config-file key dispatches to one handler per file;
//! unregistered keys pass through the identity handler. Handlers read
//! model-info (and, for the JVM handler, its source option set) but only
//! ever write fields into their own file's entry.

use nodeconf_model::{
    ConfigData, InstallOptions, CLUSTER_INFO_KEY, DATACENTER_INFO_KEY, NODE_INFO_KEY,
};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::pipeline::BuildContext;

/// Primary database config file.
pub const CASSANDRA_YAML: &str = "cassandra-yaml";

/// JVM/env shell script; receives the JMX port.
pub const CASSANDRA_ENV_SH: &str = "cassandra-env-sh";

/// Legacy JVM option set, the JMX source below 6.8.
pub const JVM_OPTIONS: &str = "jvm-options";

/// Server JVM option set, the JMX source from 6.8 on.
pub const JVM_SERVER_OPTIONS: &str = "jvm-server-options";

/// Package-only defaults file (`/etc/default/dse`).
pub const DSE_DEFAULT: &str = "dse-default";

/// Tarball-only environment script.
pub const DATASTAX_ENV_SH: &str = "datastax-env-sh";

/// Snitch topology properties file.
pub const CASSANDRA_RACKDC_PROPERTIES: &str = "cassandra-rackdc-properties";

/// Java installation choices, read by the tarball environment handler.
pub const JAVA_SETUP: &str = "java-setup";

/// Open-source product name.
pub const PRODUCT_CASSANDRA: &str = "cassandra";

/// Commercial product name.
pub const PRODUCT_DSE: &str = "dse";

const SIMPLE_SEED_PROVIDER: &str = "org.apache.cassandra.locator.SimpleSeedProvider";
const K8_SEED_PROVIDER: &str = "org.apache.cassandra.locator.K8SeedProvider";

/// System account the database service runs as.
const DEFAULT_RUN_AS: &str = "cassandra";

/// Fields the node owns in `cassandra-yaml`, across both naming
/// generations. Any pre-existing values are stripped before the handler's
/// computed values are merged, so stale address data never leaks through.
const NODE_PRIVATE_FIELDS: [&str; 9] = [
    "listen_address",
    "broadcast_address",
    "native_transport_address",
    "native_transport_broadcast_address",
    "rpc_address",
    "broadcast_rpc_address",
    "seed_provider",
    "initial_token",
    "auto_bootstrap",
];

/// An enrichment handler: synthesizes computed fields into its own file's
/// entry and returns the updated config-data.
pub type EnrichHandler = fn(&BuildContext, &str, ConfigData) -> ConfigData;

static HANDLERS: Lazy<HashMap<&'static str, EnrichHandler>> = Lazy::new(|| {
    let mut handlers: HashMap<&'static str, EnrichHandler> = HashMap::new();
    handlers.insert(CASSANDRA_YAML, enrich_cassandra_yaml);
    handlers.insert(CASSANDRA_ENV_SH, enrich_cassandra_env_sh);
    handlers.insert(DSE_DEFAULT, enrich_dse_default);
    handlers.insert(DATASTAX_ENV_SH, enrich_datastax_env_sh);
    handlers.insert(CASSANDRA_RACKDC_PROPERTIES, enrich_rackdc_properties);
    handlers
});

/// Apply the handler registered for `key`; unregistered keys pass through
/// unchanged.
pub fn enrich(ctx: &BuildContext, key: &str, data: ConfigData) -> ConfigData {
    match HANDLERS.get(key) {
        Some(handler) => handler(ctx, key, data),
        None => data,
    }
}

/// Seed provider, listen/broadcast pairs, initial token, auto-bootstrap and
/// cluster name, with the client transport pair renamed to the legacy
/// `rpc_address` names unless the product is DSE at 6.0 or later.
fn enrich_cassandra_yaml(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let node = data.get(NODE_INFO_KEY).cloned().unwrap_or(Value::Null);
    let cluster = data.get(CLUSTER_INFO_KEY).cloned().unwrap_or(Value::Null);

    let mut computed = Map::new();
    insert_present(&mut computed, "listen_address", node.get("listen-address"));
    insert_present(&mut computed, "broadcast_address", node.get("broadcast-address"));
    insert_present(
        &mut computed,
        "native_transport_address",
        node.get("native-transport-address"),
    );
    insert_present(
        &mut computed,
        "native_transport_broadcast_address",
        node.get("native-transport-broadcast-address"),
    );
    insert_present(&mut computed, "initial_token", node.get("initial-token"));
    insert_present(&mut computed, "auto_bootstrap", node.get("auto-bootstrap"));
    computed.insert(
        "seed_provider".to_string(),
        seed_provider(ctx.product, &cluster),
    );
    insert_present(&mut computed, "cluster_name", cluster.get("name"));

    // DSE 6.0 renamed the client transport pair; older versions and the
    // open-source product keep the legacy names.
    let current_names =
        ctx.product == PRODUCT_DSE && ctx.versions.at_least(ctx.version, "6.0");
    if !current_names {
        if let Some(address) = computed.remove("native_transport_address") {
            computed.insert("rpc_address".to_string(), address);
        }
        if let Some(address) = computed.remove("native_transport_broadcast_address") {
            computed.insert("broadcast_rpc_address".to_string(), address);
        }
    }

    if let Some(Value::Object(file)) = data.get_mut(key) {
        for field in NODE_PRIVATE_FIELDS {
            file.remove(field);
        }
        file.extend(computed);
    }
    data
}

/// The seed-provider entry: a Kubernetes-aware provider for the open-source
/// product, the simple static provider for DSE, parameters carrying the
/// cluster's comma-joined seed list.
fn seed_provider(product: &str, cluster: &Value) -> Value {
    let class = if product == PRODUCT_CASSANDRA {
        K8_SEED_PROVIDER
    } else {
        SIMPLE_SEED_PROVIDER
    };
    let seeds = cluster
        .get("seeds")
        .and_then(Value::as_array)
        .map(|seeds| {
            seeds
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();
    json!([{ "class_name": class, "parameters": [{ "seeds": seeds }] }])
}

/// Copy the JMX port from whichever JVM option set applies to the target
/// version into the env script.
fn enrich_cassandra_env_sh(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let source = if ctx.versions.at_least(ctx.version, "6.8") {
        JVM_SERVER_OPTIONS
    } else {
        JVM_OPTIONS
    };
    let port = data.get(source).and_then(|options| options.get("jmx-port")).cloned();
    if let (Some(port), Some(Value::Object(file))) = (port, data.get_mut(key)) {
        file.insert("jmx-port".to_string(), port);
    }
    data
}

/// Workload enablement flags (as 0/1) and the run-as identity.
fn enrich_dse_default(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let datacenter = data.get(DATACENTER_INFO_KEY).cloned().unwrap_or(Value::Null);
    let run_as = resolve_run_as(ctx.install);

    if let Some(Value::Object(file)) = data.get_mut(key) {
        for workload in ["graph-enabled", "solr-enabled", "spark-enabled"] {
            file.insert(
                workload.to_string(),
                json!(workload_flag(datacenter.get(workload))),
            );
        }
        if let Some((user, group)) = run_as {
            file.insert("cassandra-user".to_string(), json!(user));
            file.insert("cassandra-group".to_string(), json!(group));
        }
    }
    data
}

/// Java management choices and the resolved install directory for the
/// tarball environment script.
fn enrich_datastax_env_sh(ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let java = data.get(JAVA_SETUP).cloned().unwrap_or(Value::Null);
    let install_directory = resolve_install_directory(ctx.install, &data);

    if let Some(Value::Object(file)) = data.get_mut(key) {
        insert_present(file, "manage-java", java.get("manage-java"));
        insert_present(file, "java-vendor", java.get("java-vendor"));
        if let Some(directory) = install_directory {
            file.insert("install-directory".to_string(), json!(directory));
        }
    }
    data
}

/// Datacenter name and node rack for the snitch properties file.
fn enrich_rackdc_properties(_ctx: &BuildContext, key: &str, mut data: ConfigData) -> ConfigData {
    let datacenter = data
        .get(DATACENTER_INFO_KEY)
        .and_then(|dc| dc.get("name"))
        .cloned();
    let rack = data
        .get(NODE_INFO_KEY)
        .and_then(|node| node.get("rack"))
        .cloned();

    if let Some(Value::Object(file)) = data.get_mut(key) {
        if let Some(datacenter) = datacenter {
            file.insert("dc".to_string(), datacenter);
        }
        if let Some(rack) = rack {
            file.insert("rack".to_string(), rack);
        }
    }
    data
}

/// Which user/group the database process runs as.
///
/// Package installs always use the system account. Tarball installs use it
/// only when installed with root privileges, honoring operator overrides;
/// otherwise no run-as identity is set and the ssh login identity applies,
/// decided outside this library.
pub fn resolve_run_as(install: &InstallOptions) -> Option<(String, String)> {
    if !install.is_tarball() {
        return Some((DEFAULT_RUN_AS.to_string(), DEFAULT_RUN_AS.to_string()));
    }
    if install.is_root() {
        let user = install
            .run_as_user
            .clone()
            .unwrap_or_else(|| DEFAULT_RUN_AS.to_string());
        let group = install
            .run_as_group
            .clone()
            .unwrap_or_else(|| DEFAULT_RUN_AS.to_string());
        return Some((user, group));
    }
    None
}

/// Explicit install directory from install options, else the
/// installer-reported fact on node-info.
pub fn resolve_install_directory(install: &InstallOptions, data: &ConfigData) -> Option<String> {
    if !install.install_directory.is_empty() {
        return Some(install.install_directory.clone());
    }
    data.get(NODE_INFO_KEY)?
        .get("facts")?
        .get("install-directory")?
        .as_str()
        .map(str::to_string)
}

/// Coerce a boolean-like workload flag to 0/1.
fn workload_flag(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Bool(flag)) => i64::from(*flag),
        Some(Value::Number(n)) => i64::from(n.as_i64().unwrap_or(0) != 0),
        _ => 0,
    }
}

fn insert_present(map: &mut Map<String, Value>, field: &str, value: Option<&Value>) {
    if let Some(value) = value {
        if !value.is_null() {
            map.insert(field.to_string(), value.clone());
        }
    }
}
