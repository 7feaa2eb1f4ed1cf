//! ProjectConfig struct definition and defaults.

use crate::connector::DeploymentVariant;
use crate::profile::DEFAULT_PROFILE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written by this release.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Declarative project configuration.
///
/// # File Format
///
/// ```yaml
/// schema_version: 1
/// target_profile: claude-code
/// project_name: storefront
/// deployment: local
/// offline: false
/// roles:
///   issue_tracker: linear
///   notifier: slack
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Target profile id. Files written before profiles existed omit it.
    #[serde(default = "default_target_profile")]
    pub target_profile: String,

    #[serde(default)]
    pub project_name: String,

    /// Default deployment variant; `generate --context` overrides it.
    #[serde(default)]
    pub deployment: DeploymentVariant,

    /// Whether the assistant runs without network access. Selects the
    /// inline notification variant.
    #[serde(default)]
    pub offline: bool,

    /// Role -> integration id.
    #[serde(default)]
    pub roles: BTreeMap<String, String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

fn default_target_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            target_profile: default_target_profile(),
            project_name: String::new(),
            deployment: DeploymentVariant::default(),
            offline: false,
            roles: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// A fresh configuration for a named project.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }
}
