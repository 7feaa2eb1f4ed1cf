//! Implementation of the `assistkit connectors` command.
//!
//! Shows what `generate` would deliver: the file-mode JSON or the CLI
//! registration commands, followed by the secrets the connectors read.

use crate::cli::ConnectorsArgs;
use crate::config::ProjectConfig;
use crate::connector::{
    ConnectorPlan, build_connectors, connectors_for, missing_secrets, registration_command,
    render_connector_file,
};
use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use crate::profile::{ConnectorDelivery, TargetProfile};
use std::collections::HashMap;
use std::env;

/// Execute the `assistkit connectors` command.
pub fn cmd_connectors(args: ConnectorsArgs) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let config = ProjectConfig::load(ctx.config_path())?;
    let profile = config.profile()?;
    let variant = args.context.unwrap_or(config.deployment);

    let plan = build_connectors(connectors_for(&config), variant);
    let env: HashMap<String, String> = env::vars().collect();

    print!("{}", describe(profile, &plan, &env)?);
    Ok(())
}

/// Human-readable connector plan for `profile`.
fn describe(
    profile: &TargetProfile,
    plan: &ConnectorPlan,
    env: &HashMap<String, String>,
) -> Result<String> {
    let mut out = String::new();

    if plan.is_empty() {
        out.push_str("No connectors configured.\n");
        return Ok(out);
    }

    match profile.connectors {
        ConnectorDelivery::File { path } => {
            out.push_str(&format!("# {}\n", path));
            let json = render_connector_file(plan, None).map_err(|e| {
                KitError::UserError(format!("failed to serialize connector config: {}", e))
            })?;
            out.push_str(&json);
        }
        ConnectorDelivery::CliReconciliation(spec) => {
            out.push_str(
                "# registration commands (only unregistered connectors are added by `generate`)\n",
            );
            for (name, config) in &plan.connectors {
                let command = registration_command(&spec, name, config);
                out.push_str(&command.display(spec.program));
                out.push('\n');
            }
        }
    }

    let required = plan.required_secrets();
    if !required.is_empty() {
        let missing = missing_secrets(&required, env);
        out.push('\n');
        out.push_str("Secrets:\n");
        for name in &required {
            let state = if missing.contains(name) { "missing" } else { "set" };
            out.push_str(&format!("  {:32} {}\n", name, state));
        }
    }

    Ok(out)
}
