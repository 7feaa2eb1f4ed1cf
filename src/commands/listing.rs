//! Implementations of `assistkit capabilities` and `assistkit profiles`.

use crate::capability;
use crate::config::ProjectConfig;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::profile::{self, ConnectorDelivery, InvocationStyle};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Execute the `assistkit capabilities` command.
///
/// Marks configured integrations when run inside a project.
pub fn cmd_capabilities() -> Result<()> {
    let roles = match ProjectContext::resolve() {
        Ok(ctx) if ctx.is_initialized() => ProjectConfig::load(ctx.config_path())?.roles,
        _ => BTreeMap::new(),
    };
    print!("{}", capabilities_table(&roles));
    Ok(())
}

/// Execute the `assistkit profiles` command.
pub fn cmd_profiles() -> Result<()> {
    print!("{}", profiles_table());
    Ok(())
}

fn capabilities_table(roles: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for cap in capability::required().chain(capability::optional()) {
        let _ = writeln!(
            out,
            "{} ({}){}",
            cap.role,
            cap.display_name,
            if cap.required { " [required]" } else { "" }
        );
        for integration in cap.integrations {
            let marker = if roles.get(cap.role).is_some_and(|id| id == integration.id) {
                "*"
            } else {
                " "
            };
            let _ = writeln!(
                out,
                "  {} {:15} {:15} auth={}{}",
                marker,
                integration.id,
                integration.provider,
                integration.auth,
                integration
                    .connector
                    .map(|c| format!(" connector={}", c))
                    .unwrap_or_default()
            );
        }
    }
    out
}

fn profiles_table() -> String {
    let mut out = String::new();
    for p in profile::all() {
        let default = if p.id == profile::DEFAULT_PROFILE {
            " [default]"
        } else {
            ""
        };
        let _ = writeln!(out, "{} ({}){}", p.id, p.display_name, default);
        let _ = writeln!(out, "  tasks:        {}/*.{}", p.task_dir, p.extension);
        let _ = writeln!(out, "  capabilities: {}/*.{}", p.capability_dir, p.extension);
        let _ = writeln!(
            out,
            "  headers:      tasks={} capabilities={}",
            p.task_header, p.capability_header
        );
        let connectors = match p.connectors {
            ConnectorDelivery::File { path } => format!("file {}", path),
            ConnectorDelivery::CliReconciliation(spec) => {
                format!("{} {}", spec.program, spec.add_args.join(" "))
            }
        };
        let _ = writeln!(out, "  connectors:   {}", connectors);
        let invocation = match p.invocation {
            InvocationStyle::Delegation { .. } => "in-context delegation",
            InvocationStyle::ExternalProcess { .. } => "external process",
        };
        let _ = writeln!(out, "  invocation:   {}", invocation);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_marks_configured() {
        let roles = BTreeMap::from([("notifier".to_string(), "discord".to_string())]);
        let out = capabilities_table(&roles);

        let discord = out.lines().find(|l| l.contains("discord ")).unwrap();
        let slack = out.lines().find(|l| l.contains("slack ")).unwrap();
        assert!(discord.trim_start().starts_with('*'));
        assert!(!slack.trim_start().starts_with('*'));
        assert!(out.contains("browser_tester (Browser Tester) [required]"));
    }

    #[test]
    fn test_profiles_lists_every_profile() {
        let out = profiles_table();
        for p in profile::all() {
            assert!(out.contains(&format!("{} ({})", p.id, p.display_name)));
        }
        assert!(out.contains("claude-code (Claude Code) [default]"));
        assert!(out.contains("connectors:   codex mcp add"));
    }
}
