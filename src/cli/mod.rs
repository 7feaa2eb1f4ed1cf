//! CLI argument parsing for assistkit.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::connector::DeploymentVariant;
use clap::{ArgAction, Parser, Subcommand};

/// Assistkit: generate task, capability, and connector configuration for AI
/// coding assistants.
///
/// A project declares which roles it fills (issue tracker, notifier, ...)
/// and which assistant it targets; `generate` expands that into the
/// assistant's own file layout.
#[derive(Parser, Debug)]
#[command(name = "assistkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    ///
    /// `ASSISTKIT_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for assistkit.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the project configuration in the current directory.
    ///
    /// Writes `.assistkit/project.yaml`. Required roles with a single
    /// integration are assigned automatically.
    Init(InitArgs),

    /// Regenerate every task, capability, and connector file.
    ///
    /// Previously generated files in the target directories are removed
    /// first, so the output always matches the configuration.
    Generate(GenerateArgs),

    /// Show the connector configuration and the secrets it needs.
    Connectors(ConnectorsArgs),

    /// List capability roles and their integrations.
    Capabilities,

    /// List supported target assistants.
    Profiles,

    /// Copy a built-in task template into the project for editing.
    ///
    /// The copy in `.assistkit/templates/` replaces the built-in body on
    /// every later `generate`.
    Eject(EjectArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Target assistant profile (see `assistkit profiles`).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Project name. Defaults to the directory name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Role assignment as `role=integration`; repeatable.
    #[arg(short, long = "role", value_name = "ROLE=INTEGRATION")]
    pub roles: Vec<String>,

    /// Default deployment variant.
    #[arg(long, value_enum)]
    pub deployment: Option<DeploymentVariant>,

    /// The assistant runs without network access.
    #[arg(long)]
    pub offline: bool,

    /// Overwrite an existing configuration.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Execution context. Defaults to the configured deployment.
    #[arg(long, value_enum)]
    pub context: Option<DeploymentVariant>,

    /// Use inline notifications regardless of configuration.
    #[arg(long)]
    pub offline: bool,

    /// Do not write or register connectors.
    #[arg(long)]
    pub skip_connectors: bool,

    /// Print connector registration commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `connectors` command.
#[derive(Parser, Debug)]
pub struct ConnectorsArgs {
    /// Deployment variant. Defaults to the configured deployment.
    #[arg(long, value_enum)]
    pub context: Option<DeploymentVariant>,
}

/// Arguments for the `eject` command.
#[derive(Parser, Debug)]
pub struct EjectArgs {
    /// Task slug to copy (e.g., start-ticket).
    pub slug: String,

    /// Overwrite an existing override.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_full() {
        let cli = Cli::try_parse_from([
            "assistkit",
            "init",
            "--profile",
            "codex",
            "--name",
            "storefront",
            "--role",
            "notifier=slack",
            "-r",
            "issue_tracker=jira",
            "--deployment",
            "containerized",
        ])
        .unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.profile.as_deref(), Some("codex"));
            assert_eq!(args.name.as_deref(), Some("storefront"));
            assert_eq!(args.roles, vec!["notifier=slack", "issue_tracker=jira"]);
            assert_eq!(args.deployment, Some(DeploymentVariant::Containerized));
            assert!(!args.force);
        } else {
            panic!("Expected Init command");
        }
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::try_parse_from(["assistkit", "generate"]).unwrap();
        if let Command::Generate(args) = cli.command {
            assert!(args.context.is_none());
            assert!(!args.offline);
            assert!(!args.skip_connectors);
            assert!(!args.dry_run);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_generate_context() {
        let cli =
            Cli::try_parse_from(["assistkit", "generate", "--context", "containerized", "--dry-run"])
                .unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.context, Some(DeploymentVariant::Containerized));
            assert!(args.dry_run);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_rejects_unknown_context() {
        assert!(Cli::try_parse_from(["assistkit", "generate", "--context", "cloud"]).is_err());
    }

    #[test]
    fn parse_verbose_is_global() {
        let cli = Cli::try_parse_from(["assistkit", "profiles", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Profiles));
    }

    #[test]
    fn parse_eject() {
        let cli = Cli::try_parse_from(["assistkit", "eject", "ship", "--force"]).unwrap();
        if let Command::Eject(args) = cli.command {
            assert_eq!(args.slug, "ship");
            assert!(args.force);
        } else {
            panic!("Expected Eject command");
        }
    }

    #[test]
    fn parse_eject_requires_slug() {
        assert!(Cli::try_parse_from(["assistkit", "eject"]).is_err());
    }
}
