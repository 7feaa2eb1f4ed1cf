//! Config loading, validation, and mutation.

use super::model::{CURRENT_SCHEMA_VERSION, ProjectConfig};
use crate::capability;
use crate::error::{KitError, Result};
use crate::fs::atomic_write_file;
use crate::profile::{self, TargetProfile};
use std::path::Path;
use tracing::debug;

impl ProjectConfig {
    /// Load, normalize, and validate the configuration at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KitError::UserError(format!(
                "project configuration not found at '{}'.\n\
                 Run `assistkit init` to create it.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            KitError::UserError(format!(
                "failed to read project configuration '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse from YAML, then normalize and validate.
    ///
    /// An empty document yields the default configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: ProjectConfig = if yaml.trim().is_empty() {
            ProjectConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                KitError::ConfigurationError(format!("failed to parse project.yaml: {}", e))
            })?
        };

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            KitError::UserError(format!("failed to serialize project configuration: {}", e))
        })
    }

    /// Validate and atomically write the configuration to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        atomic_write_file(path, &self.to_yaml()?)
    }

    /// Auto-assign every required role that has exactly one integration.
    pub fn normalize(&mut self) {
        for cap in capability::required() {
            if let Some(only) = cap.auto_assignment()
                && !self.roles.contains_key(cap.role)
            {
                debug!(role = cap.role, integration = only.id, "auto-assigned required role");
                self.roles.insert(cap.role.to_string(), only.id.to_string());
            }
        }
    }

    /// Validate the configuration against the registries.
    ///
    /// Validation rules:
    /// - `schema_version` must not be newer than this release understands
    /// - `target_profile` must name a known profile
    /// - every role must be known, and its integration legal for that role
    /// - required single-integration roles must be assigned
    pub fn validate(&self) -> Result<()> {
        if self.schema_version == 0 || self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(KitError::ConfigurationError(format!(
                "unsupported schema_version {} (this release understands up to {})",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }

        if profile::get(&self.target_profile).is_none() {
            return Err(KitError::ConfigurationError(format!(
                "unknown target_profile '{}' (known: {})",
                self.target_profile,
                profile::ids().join(", ")
            )));
        }

        for (role, integration) in &self.roles {
            check_assignment(role, integration)?;
        }

        for cap in capability::required() {
            if cap.auto_assignment().is_some() && !self.roles.contains_key(cap.role) {
                return Err(KitError::ConfigurationError(format!(
                    "required role '{}' is not assigned",
                    cap.role
                )));
            }
        }

        Ok(())
    }

    /// Assign an integration to a role after checking it is legal.
    pub fn assign(&mut self, role: &str, integration: &str) -> Result<()> {
        check_assignment(role, integration)?;
        self.roles.insert(role.to_string(), integration.to_string());
        Ok(())
    }

    /// The configured target profile.
    ///
    /// Only fails for configurations that skipped validation.
    pub fn profile(&self) -> Result<&'static TargetProfile> {
        profile::get(&self.target_profile).ok_or_else(|| {
            KitError::ConfigurationError(format!(
                "unknown target_profile '{}'",
                self.target_profile
            ))
        })
    }
}

fn check_assignment(role: &str, integration: &str) -> Result<()> {
    let Some(cap) = capability::get(role) else {
        return Err(KitError::ConfigurationError(format!(
            "unknown role '{}' (known: {})",
            role,
            capability::all()
                .iter()
                .map(|c| c.role)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    };

    if cap.integration(integration).is_none() {
        return Err(KitError::ConfigurationError(format!(
            "integration '{}' is not allowed for role '{}' (allowed: {})",
            integration,
            role,
            cap.integrations
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(())
}

/// Parse a `role=integration` pair from the command line.
pub fn parse_assignment(value: &str) -> Result<(String, String)> {
    match value.split_once('=') {
        Some((role, integration)) if !role.trim().is_empty() && !integration.trim().is_empty() => {
            Ok((role.trim().to_string(), integration.trim().to_string()))
        }
        _ => Err(KitError::UserError(format!(
            "invalid role assignment '{}': expected ROLE=INTEGRATION",
            value
        ))),
    }
}
