//! Implementation of the `assistkit init` command.

use crate::cli::InitArgs;
use crate::config::{ProjectConfig, parse_assignment};
use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use crate::events::{Event, EventAction, append_event};
use serde_json::json;
use std::env;
use std::path::Path;

/// Execute the `assistkit init` command in the current directory.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let cwd = env::current_dir().map_err(|e| {
        KitError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    let ctx = ProjectContext::at(&cwd);

    let config = init_project(&ctx, args)?;
    let profile = config.profile()?;

    println!("Initialized assistkit project '{}'.", config.project_name);
    println!();
    println!("Config:  {}", ctx.config_path().display());
    println!("Target:  {} ({})", profile.display_name, profile.id);
    println!("Roles:");
    for (role, integration) in &config.roles {
        println!("  {:15} {}", role, integration);
    }
    println!();
    println!("Next: run `assistkit generate`.");

    Ok(())
}

/// Build, validate, and save the configuration for `ctx`.
fn init_project(ctx: &ProjectContext, args: InitArgs) -> Result<ProjectConfig> {
    if ctx.is_initialized() && !args.force {
        return Err(KitError::UserError(format!(
            "'{}' already exists.\n\nUse --force to overwrite it.",
            ctx.config_path().display()
        )));
    }

    let name = args
        .name
        .unwrap_or_else(|| directory_name(&ctx.root));
    let mut config = ProjectConfig::new(name);
    if let Some(profile) = args.profile {
        config.target_profile = profile;
    }
    if let Some(deployment) = args.deployment {
        config.deployment = deployment;
    }
    config.offline = args.offline;

    for value in &args.roles {
        let (role, integration) = parse_assignment(value)?;
        config.assign(&role, &integration)?;
    }
    config.normalize();
    config.save(ctx.config_path())?;

    let event = Event::new(EventAction::Init).with_details(json!({
        "profile": config.target_profile,
        "roles": config.roles,
    }));
    append_event(ctx, &event)?;

    Ok(config)
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}
