//! Capability registry.
//!
//! A capability is a functional slot a project can fill (a team notifier, an
//! issue tracker, ...). Each capability lists the integrations that may fill
//! it. The registry is built once and never mutated; every lookup returns
//! `None` when nothing matches and leaves fatality to the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Role of the team-notification capability.
///
/// This is the only role with an inline (no external process) invocation
/// variant.
pub const NOTIFIER_ROLE: &str = "notifier";

/// How an integration authenticates against its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// Browser-based OAuth handled by the connector itself.
    Oauth,
    /// Runs locally, no credentials.
    Local,
    /// Tokens supplied through environment variables.
    Custom,
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKind::Oauth => write!(f, "oauth"),
            AuthKind::Local => write!(f, "local"),
            AuthKind::Custom => write!(f, "custom"),
        }
    }
}

/// A concrete provider implementation of a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integration {
    pub id: &'static str,
    /// Human-readable provider name, used as role wording in templates.
    pub provider: &'static str,
    pub auth: AuthKind,
    /// Connector this integration needs, if any.
    pub connector: Option<&'static str>,
}

impl Integration {
    /// Tool wildcard granting access to every tool of the required connector.
    pub fn tool_pattern(&self) -> Option<String> {
        self.connector.map(|c| format!("mcp__{}__*", c))
    }
}

/// A named functional slot a project can fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub role: &'static str,
    pub display_name: &'static str,
    /// One-line summary used as capability file description.
    pub summary: &'static str,
    pub required: bool,
    pub integrations: &'static [Integration],
    pub default_integration: Option<&'static str>,
}

impl Capability {
    /// Look up one of this capability's integrations.
    pub fn integration(&self, id: &str) -> Option<&'static Integration> {
        self.integrations.iter().find(|i| i.id == id)
    }

    /// The integration assigned automatically when the role is required and
    /// has no alternative.
    pub fn auto_assignment(&self) -> Option<&'static Integration> {
        match self.integrations {
            [only] if self.required => Some(only),
            _ => None,
        }
    }
}

static CAPABILITIES: &[Capability] = &[
    Capability {
        role: "issue_tracker",
        display_name: "Issue Tracker",
        summary: "Reads and updates tickets in the project's issue tracker",
        required: false,
        integrations: &[
            Integration {
                id: "linear",
                provider: "Linear",
                auth: AuthKind::Oauth,
                connector: Some("linear"),
            },
            Integration {
                id: "jira",
                provider: "Jira",
                auth: AuthKind::Custom,
                connector: Some("atlassian"),
            },
            Integration {
                id: "github-issues",
                provider: "GitHub Issues",
                auth: AuthKind::Custom,
                connector: Some("github"),
            },
        ],
        default_integration: Some("linear"),
    },
    Capability {
        role: NOTIFIER_ROLE,
        display_name: "Team Notifier",
        summary: "Posts progress and results to the team chat",
        required: false,
        integrations: &[
            Integration {
                id: "slack",
                provider: "Slack",
                auth: AuthKind::Custom,
                connector: Some("slack"),
            },
            Integration {
                id: "discord",
                provider: "Discord",
                auth: AuthKind::Custom,
                connector: Some("discord"),
            },
        ],
        default_integration: Some("slack"),
    },
    Capability {
        role: "browser_tester",
        display_name: "Browser Tester",
        summary: "Drives a real browser to verify user-facing behaviour",
        required: true,
        integrations: &[Integration {
            id: "playwright",
            provider: "Playwright",
            auth: AuthKind::Local,
            connector: Some("playwright"),
        }],
        default_integration: Some("playwright"),
    },
    Capability {
        role: "code_host",
        display_name: "Code Host",
        summary: "Opens pull requests and reads review comments",
        required: false,
        integrations: &[
            Integration {
                id: "github",
                provider: "GitHub",
                auth: AuthKind::Custom,
                connector: Some("github"),
            },
            Integration {
                id: "gitlab",
                provider: "GitLab",
                auth: AuthKind::Custom,
                connector: Some("gitlab"),
            },
        ],
        default_integration: Some("github"),
    },
    Capability {
        role: "docs",
        display_name: "Documentation",
        summary: "Looks up and updates product documentation",
        required: false,
        integrations: &[
            Integration {
                id: "notion",
                provider: "Notion",
                auth: AuthKind::Oauth,
                connector: Some("notion"),
            },
            Integration {
                id: "confluence",
                provider: "Confluence",
                auth: AuthKind::Custom,
                connector: Some("atlassian"),
            },
        ],
        default_integration: Some("notion"),
    },
];

static BY_ROLE: LazyLock<BTreeMap<&'static str, &'static Capability>> =
    LazyLock::new(|| CAPABILITIES.iter().map(|c| (c.role, c)).collect());

/// All capabilities in catalog order.
pub fn all() -> &'static [Capability] {
    CAPABILITIES
}

/// Fetch a capability by role.
pub fn get(role: &str) -> Option<&'static Capability> {
    BY_ROLE.get(role).copied()
}

/// Fetch an integration of a role by id.
pub fn integration(role: &str, id: &str) -> Option<&'static Integration> {
    get(role).and_then(|c| c.integration(id))
}

/// Capabilities marked as required.
pub fn required() -> impl Iterator<Item = &'static Capability> {
    CAPABILITIES.iter().filter(|c| c.required)
}

/// Capabilities that may be left unconfigured.
pub fn optional() -> impl Iterator<Item = &'static Capability> {
    CAPABILITIES.iter().filter(|c| !c.required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_roles_are_unique() {
        let roles: BTreeSet<_> = all().iter().map(|c| c.role).collect();
        assert_eq!(roles.len(), all().len());
    }

    #[test]
    fn test_default_integration_belongs_to_capability() {
        for cap in all() {
            if let Some(default) = cap.default_integration {
                assert!(
                    cap.integration(default).is_some(),
                    "default '{}' of role '{}' is not one of its integrations",
                    default,
                    cap.role
                );
            }
        }
    }

    #[test]
    fn test_integration_ids_unique_within_role() {
        for cap in all() {
            let ids: BTreeSet<_> = cap.integrations.iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), cap.integrations.len(), "role {}", cap.role);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(get("notifier").unwrap().display_name, "Team Notifier");
        assert!(get("pager").is_none());
        assert_eq!(integration("issue_tracker", "jira").unwrap().provider, "Jira");
        assert!(integration("issue_tracker", "slack").is_none());
        assert!(integration("pager", "slack").is_none());
    }

    #[test]
    fn test_required_and_optional_partition() {
        let required: Vec<_> = required().map(|c| c.role).collect();
        let optional: Vec<_> = optional().map(|c| c.role).collect();
        assert_eq!(required, vec!["browser_tester"]);
        assert_eq!(required.len() + optional.len(), all().len());
    }

    #[test]
    fn test_auto_assignment_only_for_required_single() {
        assert_eq!(
            get("browser_tester").unwrap().auto_assignment().unwrap().id,
            "playwright"
        );
        assert!(get("notifier").unwrap().auto_assignment().is_none());
    }

    #[test]
    fn test_tool_pattern() {
        let linear = integration("issue_tracker", "linear").unwrap();
        assert_eq!(linear.tool_pattern().as_deref(), Some("mcp__linear__*"));
    }
}
