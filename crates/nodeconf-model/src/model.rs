//! Cluster, datacenter, and node topology handed to the build pipeline.
//!
//! The three topology namespaces travel inside config-data under reserved
//! keys so enrichment handlers can read them next to the file entries they
//! compute. Node-info additionally accumulates the file paths and
//! configured-path records produced by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved config-data key for cluster topology.
pub const CLUSTER_INFO_KEY: &str = "cluster-info";

/// Reserved config-data key for datacenter topology.
pub const DATACENTER_INFO_KEY: &str = "datacenter-info";

/// Reserved config-data key for node topology.
pub const NODE_INFO_KEY: &str = "node-info";

/// Reserved config-data key for the agent address file. It has no
/// definitions entry; its on-disk path is hard-coded by the path generator.
pub const ADDRESS_YAML_KEY: &str = "address-yaml";

/// The three model-info keys merged into config-data.
pub const MODEL_INFO_KEYS: [&str; 3] = [CLUSTER_INFO_KEY, DATACENTER_INFO_KEY, NODE_INFO_KEY];

/// Config-data: config-file key → field map. The one value threaded through
/// the pipeline; keys iterate in sorted order.
pub type ConfigData = Map<String, Value>;

/// Cluster-level topology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterInfo {
    pub name: String,
    /// Seed node addresses, in declaration order.
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Datacenter-level topology, including workload enablement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatacenterInfo {
    pub name: String,
    #[serde(default)]
    pub graph_enabled: bool,
    #[serde(default)]
    pub solr_enabled: bool,
    #[serde(default)]
    pub spark_enabled: bool,
}

/// Node-level topology plus the collections the pipeline accumulates onto it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeInfo {
    pub name: String,
    #[serde(default)]
    pub rack: String,
    pub listen_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_address: Option<String>,
    pub native_transport_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_transport_broadcast_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_token: Option<String>,
    #[serde(default = "default_auto_bootstrap")]
    pub auto_bootstrap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    /// Resolved filesystem-path values, appended by the configured-path
    /// recorder. Never overwritten, only extended.
    #[serde(default)]
    pub configured_paths: Vec<ConfiguredPath>,
    /// Absolute on-disk path per config-file key, filled by the path
    /// generator.
    #[serde(default)]
    pub file_paths: BTreeMap<String, String>,
    /// Arbitrary installer-reported facts (e.g. `install-directory`).
    #[serde(default)]
    pub facts: Map<String, Value>,
}

fn default_auto_bootstrap() -> bool {
    true
}

/// One resolved filesystem-path-like configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredPath {
    /// Display name of the owning config file (e.g. `cassandra.yaml`).
    pub file: String,
    /// Field path within the file, as ordered segments.
    pub path: Vec<String>,
    pub value: String,
    /// Whether the value differs from the schema default set.
    pub custom: bool,
    /// Directory-flagged (as opposed to file-flagged) in the schema.
    pub directory: bool,
}

/// The full topology input: product identity plus the three namespaces
/// merged into config-data under the reserved keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModelInfo {
    /// Product name: `cassandra` (open source) or `dse` (commercial).
    pub product: String,
    /// Target product version, compared via the `VersionCompare` seam.
    pub version: String,
    pub cluster: ClusterInfo,
    pub datacenter: DatacenterInfo,
    pub node: NodeInfo,
}

impl ModelInfo {
    /// Merge the three namespaces into config-data under the reserved keys,
    /// replacing any caller-supplied entries for them.
    pub fn merge_into(&self, data: &mut ConfigData) {
        data.insert(CLUSTER_INFO_KEY.to_string(), to_tree(&self.cluster));
        data.insert(DATACENTER_INFO_KEY.to_string(), to_tree(&self.datacenter));
        data.insert(NODE_INFO_KEY.to_string(), to_tree(&self.node));
    }
}

// Topology types are plain string-keyed data; serialization cannot fail.
fn to_tree<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("topology model serializes to plain JSON")
}
