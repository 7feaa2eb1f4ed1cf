//! Implementation of the `assistkit eject` command.

use crate::cli::EjectArgs;
use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::atomic_write_file;
use crate::template;
use serde_json::json;
use std::path::PathBuf;

/// Execute the `assistkit eject` command.
pub fn cmd_eject(args: EjectArgs) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let path = eject(&ctx, &args.slug, args.force)?;

    println!("Copied task '{}' to {}", args.slug, path.display());
    println!("Edit it, then run `assistkit generate`.");
    Ok(())
}

/// Copy a built-in task body into the project's override directory.
fn eject(ctx: &ProjectContext, slug: &str, force: bool) -> Result<PathBuf> {
    let task = template::task(slug)?;
    let path = ctx.template_override_path(task.slug);

    if path.exists() && !force {
        return Err(KitError::UserError(format!(
            "template override '{}' already exists.\n\nUse --force to overwrite it.",
            path.display()
        )));
    }

    atomic_write_file(&path, task.body)?;

    let event = Event::new(EventAction::Eject).with_details(json!({
        "task": task.slug,
        "path": path.display().to_string(),
    }));
    append_event(ctx, &event)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_eject_copies_builtin_body() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ProjectContext::at(temp_dir.path());

        let path = eject(&ctx, "triage", false).unwrap();

        assert_eq!(path, ctx.template_override_path("triage"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            template::task("triage").unwrap().body
        );
    }

    #[test]
    fn test_eject_unknown_slug() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ProjectContext::at(temp_dir.path());

        let err = eject(&ctx, "deploy", false).unwrap_err();
        assert!(matches!(err, KitError::TemplateMissing(_)));
        assert!(!ctx.templates_dir().exists());
    }

    #[test]
    fn test_eject_keeps_existing_override() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ProjectContext::at(temp_dir.path());
        fs::create_dir_all(ctx.templates_dir()).unwrap();
        fs::write(ctx.template_override_path("ship"), "custom").unwrap();

        assert!(eject(&ctx, "ship", false).is_err());
        assert_eq!(fs::read_to_string(ctx.template_override_path("ship")).unwrap(), "custom");

        eject(&ctx, "ship", true).unwrap();
        assert_ne!(fs::read_to_string(ctx.template_override_path("ship")).unwrap(), "custom");
    }
}
