//! Connector descriptor table.
//!
//! Each descriptor names an external tool-connection server: the command that
//! starts it, its base arguments, the environment it needs (as symbolic
//! `${VAR}` placeholders, never literal secrets), and any extra arguments a
//! deployment variant appends.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Where the assistant and its connectors will run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentVariant {
    /// Developer machine with a display and network access.
    #[default]
    Local,
    /// Headless container.
    Containerized,
}

impl std::fmt::Display for DeploymentVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentVariant::Local => write!(f, "local"),
            DeploymentVariant::Containerized => write!(f, "containerized"),
        }
    }
}

/// Static description of one connector server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorDescriptor {
    pub name: &'static str,
    pub command: &'static str,
    pub args: &'static [&'static str],
    /// Environment entries as `(KEY, "${VAR}")`.
    pub env: &'static [(&'static str, &'static str)],
    pub variant_args: &'static [(DeploymentVariant, &'static [&'static str])],
}

impl ConnectorDescriptor {
    /// Extra arguments appended for a deployment variant.
    pub fn extra_args(&self, variant: DeploymentVariant) -> &'static [&'static str] {
        self.variant_args
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|(_, args)| *args)
            .unwrap_or(&[])
    }
}

static DESCRIPTORS: &[ConnectorDescriptor] = &[
    ConnectorDescriptor {
        name: "atlassian",
        command: "uvx",
        args: &["mcp-atlassian"],
        env: &[
            ("ATLASSIAN_URL", "${ATLASSIAN_URL}"),
            ("ATLASSIAN_EMAIL", "${ATLASSIAN_EMAIL}"),
            ("ATLASSIAN_API_TOKEN", "${ATLASSIAN_API_TOKEN}"),
        ],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "discord",
        command: "npx",
        args: &["-y", "mcp-discord"],
        env: &[("DISCORD_TOKEN", "${DISCORD_TOKEN}")],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "github",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-github"],
        env: &[(
            "GITHUB_PERSONAL_ACCESS_TOKEN",
            "${GITHUB_PERSONAL_ACCESS_TOKEN}",
        )],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "gitlab",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-gitlab"],
        env: &[
            (
                "GITLAB_PERSONAL_ACCESS_TOKEN",
                "${GITLAB_PERSONAL_ACCESS_TOKEN}",
            ),
            ("GITLAB_API_URL", "${GITLAB_API_URL}"),
        ],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "linear",
        command: "npx",
        args: &["-y", "mcp-remote", "https://mcp.linear.app/sse"],
        env: &[],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "notion",
        command: "npx",
        args: &["-y", "mcp-remote", "https://mcp.notion.com/sse"],
        env: &[],
        variant_args: &[],
    },
    ConnectorDescriptor {
        name: "playwright",
        command: "npx",
        args: &["-y", "@playwright/mcp@latest"],
        env: &[],
        variant_args: &[(DeploymentVariant::Containerized, &["--headless", "--isolated"])],
    },
    ConnectorDescriptor {
        name: "slack",
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-slack"],
        env: &[
            ("SLACK_BOT_TOKEN", "${SLACK_BOT_TOKEN}"),
            ("SLACK_TEAM_ID", "${SLACK_TEAM_ID}"),
        ],
        variant_args: &[],
    },
];

static BY_NAME: LazyLock<BTreeMap<&'static str, &'static ConnectorDescriptor>> =
    LazyLock::new(|| DESCRIPTORS.iter().map(|d| (d.name, d)).collect());

/// Fetch a descriptor by connector name.
pub fn get(name: &str) -> Option<&'static ConnectorDescriptor> {
    BY_NAME.get(name).copied()
}

/// All descriptors, sorted by name.
#[cfg(test)]
pub fn all() -> &'static [ConnectorDescriptor] {
    DESCRIPTORS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability;

    #[test]
    fn test_every_integration_connector_has_descriptor() {
        for cap in capability::all() {
            for integration in cap.integrations {
                if let Some(connector) = integration.connector {
                    assert!(
                        get(connector).is_some(),
                        "integration '{}' needs unknown connector '{}'",
                        integration.id,
                        connector
                    );
                }
            }
        }
    }

    #[test]
    fn test_env_values_are_symbolic() {
        for descriptor in all() {
            for (key, value) in descriptor.env {
                assert_eq!(*value, format!("${{{}}}", key), "{}", descriptor.name);
            }
        }
    }

    #[test]
    fn test_extra_args_by_variant() {
        let playwright = get("playwright").unwrap();
        assert!(playwright.extra_args(DeploymentVariant::Local).is_empty());
        assert_eq!(
            playwright.extra_args(DeploymentVariant::Containerized),
            &["--headless", "--isolated"]
        );
    }

    #[test]
    fn test_descriptors_sorted_by_name() {
        let names: Vec<_> = all().iter().map(|d| d.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
