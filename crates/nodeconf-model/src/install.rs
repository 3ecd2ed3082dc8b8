//! Install-time options supplied by the orchestration layer.

use serde::{Deserialize, Serialize};

/// Deployment mode for the node. Mutually exclusive per node; several
/// pipeline stages branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    Package,
    Tarball,
}

/// Privileges the installer ran with. Only consulted for tarball installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallPrivileges {
    Root,
    Normal,
}

/// Install options for one node, read-only throughout the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallOptions {
    pub install_type: InstallType,
    /// Explicit install directory; empty means "fall back to the
    /// installer-reported fact".
    #[serde(default)]
    pub install_directory: String,
    pub install_privileges: InstallPrivileges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<String>,
}

impl InstallOptions {
    pub fn is_tarball(&self) -> bool {
        self.install_type == InstallType::Tarball
    }

    pub fn is_root(&self) -> bool {
        self.install_privileges == InstallPrivileges::Root
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            install_type: InstallType::Package,
            install_directory: String::new(),
            install_privileges: InstallPrivileges::Root,
            run_as_user: None,
            run_as_group: None,
        }
    }
}
