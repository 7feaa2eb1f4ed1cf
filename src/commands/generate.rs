//! Implementation of the `assistkit generate` command.

use crate::cli::GenerateArgs;
use crate::config::ProjectConfig;
use crate::connector::{ConnectorCli, ProcessConnectorCli, ReconcileOutcome};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::generate::{ConnectorDelivered, GenerateOptions, GenerationReport, generate};
use crate::profile::ConnectorDelivery;
use serde_json::json;
use std::env;

/// Execute the `assistkit generate` command.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let config = ProjectConfig::load(ctx.config_path())?;
    let profile = config.profile()?;
    let options = options_from(&config, &args);

    let mut process_cli = match profile.connectors {
        ConnectorDelivery::CliReconciliation(spec) => Some(
            ProcessConnectorCli::new(spec, ctx.root.clone(), env::vars().collect())
                .dry_run(args.dry_run),
        ),
        ConnectorDelivery::File { .. } => None,
    };
    let cli = process_cli
        .as_mut()
        .map(|c| c as &mut dyn ConnectorCli);

    let report = generate(&ctx, &config, &options, cli)?;
    record_events(&ctx, &config, &options, &report, args.dry_run)?;
    print_report(&ctx, profile.display_name, &report, args.dry_run);

    Ok(())
}

/// Configured defaults overridden by command-line flags.
fn options_from(config: &ProjectConfig, args: &GenerateArgs) -> GenerateOptions {
    let mut options = GenerateOptions::from_config(config);
    if let Some(context) = args.context {
        options.context = context;
    }
    options.offline |= args.offline;
    options.skip_connectors = args.skip_connectors;
    options
}

fn record_events(
    ctx: &ProjectContext,
    config: &ProjectConfig,
    options: &GenerateOptions,
    report: &GenerationReport,
    dry_run: bool,
) -> Result<()> {
    if let ConnectorDelivered::Reconciled(outcome) = &report.connectors
        && !dry_run
    {
        for connector in &outcome.registered {
            let event = Event::new(EventAction::RegisterConnector).with_details(json!({
                "profile": config.target_profile,
                "connector": connector,
            }));
            append_event(ctx, &event)?;
        }
    }

    let event = Event::new(EventAction::Generate).with_details(json!({
        "profile": config.target_profile,
        "context": options.context,
        "offline": options.offline,
        "tasks": report.tasks.len(),
        "capabilities": report.capabilities.len(),
        "excluded": report.excluded,
        "warnings": report.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
    }));
    append_event(ctx, &event)
}

fn print_report(ctx: &ProjectContext, target: &str, report: &GenerationReport, dry_run: bool) {
    println!(
        "Generated {} task file(s) and {} capability file(s) for {}.",
        report.tasks.len(),
        report.capabilities.len(),
        target
    );
    for path in report.written() {
        let shown = path.strip_prefix(&ctx.root).unwrap_or(path);
        println!("  {}", shown.display());
    }
    if !report.excluded.is_empty() {
        println!("Hidden in this context: {}", report.excluded.join(", "));
    }

    match &report.connectors {
        ConnectorDelivered::Skipped => {}
        ConnectorDelivered::File { path, connectors } => {
            let shown = path.strip_prefix(&ctx.root).unwrap_or(path);
            println!(
                "Connectors: {} ({})",
                shown.display(),
                if connectors.is_empty() {
                    "none".to_string()
                } else {
                    connectors.join(", ")
                }
            );
        }
        ConnectorDelivered::Reconciled(outcome) => {
            println!("Connectors: {}", reconcile_summary(outcome, dry_run));
        }
        ConnectorDelivered::NoCli => {
            println!("Connectors: not registered (no assistant CLI available)");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}

/// Under `--dry-run` nothing was spawned, so registrations are only planned.
fn reconcile_summary(outcome: &ReconcileOutcome, dry_run: bool) -> String {
    let registered = if dry_run {
        "would be registered"
    } else {
        "registered"
    };
    format!(
        "{} {}, {} already present, {} failed",
        outcome.registered.len(),
        registered,
        outcome.already_present.len(),
        outcome.failures.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DeploymentVariant;
    use crate::test_support::{DirGuard, create_test_project};
    use serial_test::serial;
    use std::fs;

    fn args() -> GenerateArgs {
        GenerateArgs {
            context: None,
            offline: false,
            skip_connectors: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ProjectConfig::new("storefront");
        config.deployment = DeploymentVariant::Containerized;

        let defaults = options_from(&config, &args());
        assert_eq!(defaults.context, DeploymentVariant::Containerized);
        assert!(!defaults.offline);

        let overridden = options_from(
            &config,
            &GenerateArgs {
                context: Some(DeploymentVariant::Local),
                offline: true,
                skip_connectors: true,
                ..args()
            },
        );
        assert_eq!(overridden.context, DeploymentVariant::Local);
        assert!(overridden.offline);
        assert!(overridden.skip_connectors);
    }

    #[test]
    fn test_offline_flag_cannot_disable_configured_offline() {
        let mut config = ProjectConfig::new("storefront");
        config.offline = true;
        assert!(options_from(&config, &args()).offline);
    }

    #[test]
    fn test_reconcile_summary_dry_run_wording() {
        let outcome = ReconcileOutcome {
            registered: vec!["assistkit-slack".to_string(), "assistkit-linear".to_string()],
            already_present: vec!["assistkit-playwright".to_string()],
            failures: Vec::new(),
        };

        assert_eq!(
            reconcile_summary(&outcome, false),
            "2 registered, 1 already present, 0 failed"
        );
        assert_eq!(
            reconcile_summary(&outcome, true),
            "2 would be registered, 1 already present, 0 failed"
        );
    }

    #[test]
    #[serial]
    fn test_cmd_generate_from_subdirectory() {
        let (temp_dir, ctx, _config) = create_test_project("claude-code", &[("notifier", "slack")]);
        let nested = temp_dir.path().join("web");
        fs::create_dir(&nested).unwrap();
        let _guard = DirGuard::new(&nested);

        cmd_generate(args()).unwrap();

        assert!(ctx.root.join(".claude/commands/standup.md").exists());
        assert!(ctx.root.join(".claude/agents/notifier.md").exists());
        assert!(ctx.root.join(".mcp.json").exists());
        assert!(!nested.join(".claude").exists());

        let log = fs::read_to_string(ctx.events_path()).unwrap();
        let last: Event = serde_json::from_str(log.lines().last().unwrap()).unwrap();
        assert_eq!(last.action, EventAction::Generate);
        assert_eq!(last.details["capabilities"], 2);
    }
}
