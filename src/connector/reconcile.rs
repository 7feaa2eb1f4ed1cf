//! Connector reconciliation against an assistant CLI's own registry.
//!
//! Registration is not transactional: each missing connector gets one
//! registration attempt, failures are reported per connector, and nothing is
//! rolled back. Re-running only retries what is still missing.

use super::builder::{ConnectorConfig, ConnectorPlan};
use crate::error::Result;
use crate::profile::ConnectorCliSpec;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Prefix applied to connector names registered by assistkit.
pub const CONNECTOR_NAMESPACE: &str = "assistkit";

/// Separator between flags and the connector's own command line.
pub const ARG_SEPARATOR: &str = "--";

/// One registration command, without the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCommand {
    /// Un-namespaced connector name.
    pub connector: String,
    pub args: Vec<String>,
}

impl RegistrationCommand {
    /// Shell-quoted command line for display.
    pub fn display(&self, program: &str) -> String {
        let mut words = vec![program.to_string()];
        words.extend(self.args.iter().cloned());
        shell_words::join(words)
    }
}

/// Access to the external tool's connector registry.
pub trait ConnectorCli {
    /// Names currently registered, as printed by the tool (namespaced).
    fn list_registered(&mut self) -> Result<Vec<String>>;

    /// Issue one registration command.
    fn register(&mut self, command: &RegistrationCommand) -> std::result::Result<(), String>;
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub registered: Vec<String>,
    pub already_present: Vec<String>,
    /// `(connector, reason)` for each failed registration.
    pub failures: Vec<(String, String)>,
}

/// Namespaced identifier for a connector.
pub fn namespaced(name: &str) -> String {
    format!("{}-{}", CONNECTOR_NAMESPACE, name)
}

/// Build the registration command for one connector.
///
/// Layout: add subcommand, namespaced id, one env flag pair per entry, the
/// separator, then the literal command and its args.
pub fn registration_command(
    spec: &ConnectorCliSpec,
    name: &str,
    config: &ConnectorConfig,
) -> RegistrationCommand {
    let mut args: Vec<String> = spec.add_args.iter().map(|a| a.to_string()).collect();
    args.push(namespaced(name));

    for (key, value) in &config.env {
        args.push(spec.env_flag.to_string());
        args.push(format!("{}={}", key, shell_reference(value)));
    }

    args.push(ARG_SEPARATOR.to_string());
    args.push(config.command.clone());
    args.extend(config.args.iter().cloned());

    RegistrationCommand {
        connector: name.to_string(),
        args,
    }
}

/// `${VAR}` becomes `$VAR`; anything else is passed through.
fn shell_reference(value: &str) -> String {
    match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(var) if !var.contains(['{', '}', '$']) => format!("${}", var),
        _ => value.to_string(),
    }
}

/// Extract assistkit-owned connector names from `list` output.
///
/// The first whitespace-separated token of each line is taken as a name;
/// only names carrying the namespace prefix are kept, with the prefix removed.
pub fn parse_registered(output: &str) -> BTreeSet<String> {
    let prefix = format!("{}-", CONNECTOR_NAMESPACE);
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|token| token.trim_end_matches(':'))
        .filter_map(|token| token.strip_prefix(&prefix))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Commands for every desired connector that is not yet registered, in name order.
pub fn plan_registrations(
    spec: &ConnectorCliSpec,
    plan: &ConnectorPlan,
    registered: &BTreeSet<String>,
) -> Vec<RegistrationCommand> {
    plan.connectors
        .iter()
        .filter(|(name, _)| !registered.contains(*name))
        .map(|(name, config)| registration_command(spec, name, config))
        .collect()
}

/// Register every desired connector missing from the tool.
///
/// Fails only when the registry cannot be listed. Individual registration
/// failures are collected in the outcome and do not stop the batch.
pub fn reconcile(
    cli: &mut dyn ConnectorCli,
    spec: &ConnectorCliSpec,
    plan: &ConnectorPlan,
) -> Result<ReconcileOutcome> {
    if plan.is_empty() {
        return Ok(ReconcileOutcome::default());
    }

    let listed = cli.list_registered()?;
    let registered = parse_registered(&listed.join("\n"));

    let mut outcome = ReconcileOutcome {
        already_present: plan
            .names()
            .filter(|n| registered.contains(*n))
            .map(str::to_string)
            .collect(),
        ..Default::default()
    };

    for command in plan_registrations(spec, plan, &registered) {
        match cli.register(&command) {
            Ok(()) => {
                info!(connector = %command.connector, "connector registered");
                outcome.registered.push(command.connector);
            }
            Err(reason) => {
                warn!(connector = %command.connector, %reason, "connector registration failed");
                outcome.failures.push((command.connector, reason));
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::builder::build_connectors;
    use crate::connector::descriptor::DeploymentVariant;
    use crate::error::KitError;

    const CODEX_CLI: ConnectorCliSpec = ConnectorCliSpec {
        program: "codex",
        list_args: &["mcp", "list"],
        add_args: &["mcp", "add"],
        env_flag: "--env",
    };

    /// Arguments before the separator.
    fn flags(cmd: &RegistrationCommand) -> &[String] {
        match cmd.args.iter().position(|a| a == ARG_SEPARATOR) {
            Some(idx) => &cmd.args[..idx],
            None => &cmd.args,
        }
    }

    #[derive(Default)]
    struct FakeCli {
        listed: Vec<String>,
        fail_on: Vec<String>,
        list_fails: bool,
        issued: Vec<RegistrationCommand>,
    }

    impl ConnectorCli for FakeCli {
        fn list_registered(&mut self) -> Result<Vec<String>> {
            if self.list_fails {
                return Err(KitError::ConnectorError("codex not found".to_string()));
            }
            Ok(self.listed.clone())
        }

        fn register(&mut self, command: &RegistrationCommand) -> std::result::Result<(), String> {
            self.issued.push(command.clone());
            if self.fail_on.contains(&command.connector) {
                Err("exit code 1".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_registration_command_layout() {
        let plan = build_connectors(["slack"], DeploymentVariant::Local);
        let cmd = registration_command(&CODEX_CLI, "slack", &plan.connectors["slack"]);

        assert_eq!(
            cmd.args,
            vec![
                "mcp",
                "add",
                "assistkit-slack",
                "--env",
                "SLACK_BOT_TOKEN=$SLACK_BOT_TOKEN",
                "--env",
                "SLACK_TEAM_ID=$SLACK_TEAM_ID",
                "--",
                "npx",
                "-y",
                "@modelcontextprotocol/server-slack",
            ]
        );
    }

    #[test]
    fn test_connector_args_never_flagged() {
        let plan = build_connectors(["playwright"], DeploymentVariant::Containerized);
        let cmd = registration_command(&CODEX_CLI, "playwright", &plan.connectors["playwright"]);

        assert!(!flags(&cmd).iter().any(|a| a == "--headless"));
        let sep = cmd.args.iter().position(|a| a == "--").unwrap();
        assert_eq!(cmd.args[sep + 1], "npx");
        assert!(cmd.args[sep..].iter().any(|a| a == "--headless"));
    }

    #[test]
    fn test_display_quotes_env_references() {
        let plan = build_connectors(["github"], DeploymentVariant::Local);
        let cmd = registration_command(&CODEX_CLI, "github", &plan.connectors["github"]);
        let shown = cmd.display(CODEX_CLI.program);

        assert!(shown.starts_with("codex mcp add assistkit-github --env "));
        assert!(shown.contains("'GITHUB_PERSONAL_ACCESS_TOKEN=$GITHUB_PERSONAL_ACCESS_TOKEN'"));

        let words = shell_words::split(&shown).unwrap();
        assert_eq!(words[0], "codex");
        assert_eq!(&words[1..], cmd.args.as_slice());
    }

    #[test]
    fn test_parse_registered_filters_namespace() {
        let output = "Name              Command\n\
                      assistkit-linear  npx -y mcp-remote\n\
                      personal-notes    node notes.js\n\
                      assistkit-slack:  npx\n";
        let names: Vec<_> = parse_registered(output).into_iter().collect();
        assert_eq!(names, vec!["linear", "slack"]);
    }

    #[test]
    fn test_only_missing_connectors_registered() {
        let plan = build_connectors(["linear", "slack"], DeploymentVariant::Local);
        let mut cli = FakeCli {
            listed: vec!["assistkit-linear  npx".to_string()],
            ..Default::default()
        };

        let outcome = reconcile(&mut cli, &CODEX_CLI, &plan).unwrap();

        assert_eq!(cli.issued.len(), 1);
        assert_eq!(cli.issued[0].connector, "slack");
        assert_eq!(outcome.registered, vec!["slack"]);
        assert_eq!(outcome.already_present, vec!["linear"]);
    }

    #[test]
    fn test_empty_desired_set_issues_nothing() {
        let mut cli = FakeCli {
            list_fails: true,
            ..Default::default()
        };

        let outcome = reconcile(&mut cli, &CODEX_CLI, &ConnectorPlan::default()).unwrap();

        assert!(cli.issued.is_empty());
        assert_eq!(outcome, ReconcileOutcome::default());
    }

    #[test]
    fn test_rerun_after_full_registration_is_noop() {
        let plan = build_connectors(["linear", "slack"], DeploymentVariant::Local);
        let mut cli = FakeCli {
            listed: vec![
                "assistkit-linear npx".to_string(),
                "assistkit-slack npx".to_string(),
            ],
            ..Default::default()
        };

        let outcome = reconcile(&mut cli, &CODEX_CLI, &plan).unwrap();
        assert!(cli.issued.is_empty());
        assert!(outcome.registered.is_empty());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let plan = build_connectors(["github", "linear", "slack"], DeploymentVariant::Local);
        let mut cli = FakeCli {
            fail_on: vec!["github".to_string()],
            ..Default::default()
        };

        let outcome = reconcile(&mut cli, &CODEX_CLI, &plan).unwrap();

        assert_eq!(cli.issued.len(), 3);
        assert_eq!(outcome.registered, vec!["linear", "slack"]);
        assert_eq!(
            outcome.failures,
            vec![("github".to_string(), "exit code 1".to_string())]
        );
    }

    #[test]
    fn test_list_failure_propagates() {
        let plan = build_connectors(["linear"], DeploymentVariant::Local);
        let mut cli = FakeCli {
            list_fails: true,
            ..Default::default()
        };

        assert!(reconcile(&mut cli, &CODEX_CLI, &plan).is_err());
        assert!(cli.issued.is_empty());
    }
}
