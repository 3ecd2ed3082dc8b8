//! `nodeconf-model` — shared input types for the nodeconf build pipeline.
//!
//! Provides:
//! - Cluster/datacenter/node topology (`ModelInfo` and friends)
//! - Install options (package vs tarball, privileges, run-as overrides)
//! - The per-product config definitions tree and its path classifier
//! - The version-comparison seam (`VersionCompare`)

pub mod definitions;
pub mod install;
pub mod model;
pub mod version;

// Re-export most-used types at crate root.
pub use definitions::{Definitions, FieldDef, FieldKind, FileDefinition, PathField};
pub use install::{InstallOptions, InstallPrivileges, InstallType};
pub use model::{
    ClusterInfo, ConfigData, ConfiguredPath, DatacenterInfo, ModelInfo, NodeInfo,
    ADDRESS_YAML_KEY, CLUSTER_INFO_KEY, DATACENTER_INFO_KEY, MODEL_INFO_KEYS, NODE_INFO_KEY,
};
pub use version::{DottedVersions, VersionCompare};
