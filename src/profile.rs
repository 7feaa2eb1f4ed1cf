//! Target profile registry.
//!
//! A target profile describes everything that differs between supported AI
//! coding assistants: where generated files go, whether they carry a
//! structured header, how one capability is delegated to from inside a task,
//! and how connectors are delivered. Downstream code branches only on these
//! descriptor fields and never on the profile id.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Profile used when a project configuration does not name one.
pub const DEFAULT_PROFILE: &str = "claude-code";

/// How a task instructs the assistant to use a capability.
///
/// Templates are rendered with `{role}`, `{display_name}`, and `{file}`
/// (the capability file path relative to the project root).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStyle {
    /// In-context delegation to a named sub-agent.
    Delegation { template: &'static str },
    /// Run the assistant CLI as a separate process fed with the capability file.
    ExternalProcess { template: &'static str },
}

/// Commands of an assistant CLI that manages its own connector registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorCliSpec {
    pub program: &'static str,
    pub list_args: &'static [&'static str],
    pub add_args: &'static [&'static str],
    pub env_flag: &'static str,
}

/// How connector configuration reaches the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorDelivery {
    /// A JSON file, relative to the project root.
    File { path: &'static str },
    /// Registration commands issued against the assistant CLI.
    CliReconciliation(ConnectorCliSpec),
}

/// Output conventions for one assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetProfile {
    pub id: &'static str,
    pub display_name: &'static str,
    pub task_dir: &'static str,
    pub capability_dir: &'static str,
    /// File extension for tasks and capabilities, without the dot.
    pub extension: &'static str,
    pub task_header: bool,
    pub capability_header: bool,
    pub connectors: ConnectorDelivery,
    pub invocation: InvocationStyle,
}

impl TargetProfile {
    /// File name for an artifact with the given stem.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    /// Capability file path relative to the project root.
    pub fn capability_path(&self, role: &str) -> PathBuf {
        PathBuf::from(self.capability_dir).join(self.file_name(role))
    }

    /// Task file path relative to the project root.
    pub fn task_path(&self, stem: &str) -> PathBuf {
        PathBuf::from(self.task_dir).join(self.file_name(stem))
    }

    /// Connector config file path, when the profile delivers connectors as a file.
    pub fn connector_config_path(&self) -> Option<&'static str> {
        match self.connectors {
            ConnectorDelivery::File { path } => Some(path),
            ConnectorDelivery::CliReconciliation(_) => None,
        }
    }
}

static PROFILES: &[TargetProfile] = &[
    TargetProfile {
        id: "claude-code",
        display_name: "Claude Code",
        task_dir: ".claude/commands",
        capability_dir: ".claude/agents",
        extension: "md",
        task_header: true,
        capability_header: true,
        connectors: ConnectorDelivery::File { path: ".mcp.json" },
        invocation: InvocationStyle::Delegation {
            template: "Use the Task tool to delegate this step to the `{role}` subagent ({display_name}) and wait for its report.",
        },
    },
    TargetProfile {
        id: "gemini",
        display_name: "Gemini CLI",
        task_dir: ".gemini/commands",
        capability_dir: ".gemini/agents",
        extension: "md",
        task_header: true,
        capability_header: false,
        connectors: ConnectorDelivery::File {
            path: ".gemini/settings.json",
        },
        invocation: InvocationStyle::ExternalProcess {
            template: "Run `gemini -p \"$(cat {file})\"` to hand this step to the {display_name} and use its output.",
        },
    },
    TargetProfile {
        id: "codex",
        display_name: "Codex CLI",
        task_dir: ".codex/prompts",
        capability_dir: ".codex/agents",
        extension: "md",
        task_header: false,
        capability_header: false,
        connectors: ConnectorDelivery::CliReconciliation(ConnectorCliSpec {
            program: "codex",
            list_args: &["mcp", "list"],
            add_args: &["mcp", "add"],
            env_flag: "--env",
        }),
        invocation: InvocationStyle::ExternalProcess {
            template: "Run `codex exec \"$(cat {file})\"` to hand this step to the {display_name} and use its output.",
        },
    },
    TargetProfile {
        id: "cursor",
        display_name: "Cursor Agent",
        task_dir: ".cursor/commands",
        capability_dir: ".cursor/agents",
        extension: "md",
        task_header: false,
        capability_header: true,
        connectors: ConnectorDelivery::File {
            path: ".cursor/mcp.json",
        },
        invocation: InvocationStyle::ExternalProcess {
            template: "Run `cursor-agent -p \"$(cat {file})\"` to hand this step to the {display_name} and use its output.",
        },
    },
];

static BY_ID: LazyLock<BTreeMap<&'static str, &'static TargetProfile>> =
    LazyLock::new(|| PROFILES.iter().map(|p| (p.id, p)).collect());

/// All profiles in catalog order.
pub fn all() -> &'static [TargetProfile] {
    PROFILES
}

/// Fetch a profile by id.
pub fn get(id: &str) -> Option<&'static TargetProfile> {
    BY_ID.get(id).copied()
}

/// Known profile ids, for error messages.
pub fn ids() -> Vec<&'static str> {
    PROFILES.iter().map(|p| p.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_exists() {
        assert!(get(DEFAULT_PROFILE).is_some());
    }

    #[test]
    fn test_ids_unique() {
        let mut ids = ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_paths() {
        let claude = get("claude-code").unwrap();
        assert_eq!(
            claude.capability_path("notifier"),
            PathBuf::from(".claude/agents/notifier.md")
        );
        assert_eq!(
            claude.task_path("triage"),
            PathBuf::from(".claude/commands/triage.md")
        );
        assert_eq!(claude.connector_config_path(), Some(".mcp.json"));
        assert_eq!(get("codex").unwrap().connector_config_path(), None);
    }

    #[test]
    fn test_task_and_capability_dirs_differ() {
        for profile in all() {
            assert_ne!(profile.task_dir, profile.capability_dir, "{}", profile.id);
        }
    }
}
