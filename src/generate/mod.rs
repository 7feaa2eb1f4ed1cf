//! Generation orchestrator.
//!
//! One pass owns the profile's task and capability directories: each is
//! cleared of previously generated files and then rewritten in full.
//! Connector delivery runs last.
//!
//! Per-item problems (a task needing an unassigned role, a failed connector
//! registration) become [`Warning`] values on the report. Only structural
//! problems (invalid configuration, unwritable output) stop the pass.

mod warning;


pub use warning::Warning;

use crate::artifact::{Artifact, ArtifactHeader};
use crate::capability;
use crate::config::ProjectConfig;
use crate::connector::{
    ConnectorCli, ConnectorPlan, DeploymentVariant, ReconcileOutcome, build_connectors,
    connectors_for, reconcile, render_connector_file,
};
use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use crate::fs::{atomic_write_file, clear_generated};
use crate::profile::{ConnectorDelivery, TargetProfile};
use crate::template::{self, TaskTemplate};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Call-time options of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Execution context for task visibility and connector variant args.
    pub context: DeploymentVariant,
    /// Select the inline notification variant.
    pub offline: bool,
    pub skip_connectors: bool,
}

impl GenerateOptions {
    /// Options taken from the project's configured defaults.
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            context: config.deployment,
            offline: config.offline,
            skip_connectors: false,
        }
    }
}

/// What happened to connectors during a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectorDelivered {
    #[default]
    Skipped,
    File {
        path: PathBuf,
        connectors: Vec<String>,
    },
    Reconciled(ReconcileOutcome),
    /// The profile reconciles through a CLI but none was supplied.
    NoCli,
}

/// Summary of one pass.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub removed: Vec<PathBuf>,
    pub tasks: Vec<PathBuf>,
    pub capabilities: Vec<PathBuf>,
    /// Task slugs hidden in the active context.
    pub excluded: Vec<&'static str>,
    pub connectors: ConnectorDelivered,
    pub warnings: Vec<Warning>,
}

impl GenerationReport {
    fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Every file written in this pass, tasks first.
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.tasks.iter().chain(&self.capabilities)
    }
}

/// Run one full regeneration pass for `config` under `ctx.root`.
///
/// `cli` is used only by profiles that reconcile connectors through an
/// assistant CLI.
pub fn generate(
    ctx: &ProjectContext,
    config: &ProjectConfig,
    options: &GenerateOptions,
    cli: Option<&mut dyn ConnectorCli>,
) -> Result<GenerationReport> {
    config.validate()?;
    let profile = config.profile()?;
    let mut report = GenerationReport::default();

    info!(
        profile = profile.id,
        context = %options.context,
        offline = options.offline,
        "generating"
    );

    let task_dir = ctx.root.join(profile.task_dir);
    report
        .removed
        .extend(clear_generated(&task_dir, profile.extension)?);
    for task in template::tasks() {
        write_task(ctx, config, profile, options, task, &mut report)?;
    }

    let capability_dir = ctx.root.join(profile.capability_dir);
    report
        .removed
        .extend(clear_generated(&capability_dir, profile.extension)?);
    for (role, integration) in &config.roles {
        write_capability(ctx, config, profile, options, role, integration, &mut report)?;
    }

    if options.skip_connectors {
        debug!("connector delivery skipped");
    } else {
        deliver_connectors(ctx, config, profile, options, cli, &mut report)?;
    }

    info!(
        tasks = report.tasks.len(),
        capabilities = report.capabilities.len(),
        warnings = report.warnings.len(),
        "generation complete"
    );
    Ok(report)
}

fn write_task(
    ctx: &ProjectContext,
    config: &ProjectConfig,
    profile: &TargetProfile,
    options: &GenerateOptions,
    task: &'static TaskTemplate,
    report: &mut GenerationReport,
) -> Result<()> {
    let Some(stem) = task.output_stem(options.context) else {
        debug!(task = task.slug, context = %options.context, "task hidden in context");
        report.excluded.push(task.slug);
        return Ok(());
    };

    let body = task_body(ctx, task, report);
    let resolved = match template::resolve(&body, &config.roles, profile, options.offline) {
        Ok(resolved) => resolved,
        Err(e) if matches!(body, Cow::Owned(_)) => {
            report.warn(Warning::TemplateOverrideInvalid {
                task: task.slug.to_string(),
                reason: e.to_string(),
            });
            template::resolve(task.body, &config.roles, profile, options.offline)
                .map_err(|e| KitError::UserError(format!("task '{}': {}", task.slug, e)))?
        }
        Err(e) => return Err(KitError::UserError(format!("task '{}': {}", task.slug, e))),
    };

    if let Some(missing) = resolved.missing {
        report.warn(Warning::MissingCapability {
            task: stem.to_string(),
            role: missing.role,
        });
    }

    let artifact = Artifact::new(
        ArtifactHeader {
            name: stem.to_string(),
            description: Some(task.metadata.description.to_string()),
            argument_hint: task.metadata.argument_hint.map(str::to_string),
            tools: None,
        },
        resolved.content,
    );

    let path = ctx.root.join(profile.task_path(stem));
    atomic_write_file(&path, &artifact.render(profile.task_header)?)?;
    debug!(path = %path.display(), "task written");
    report.tasks.push(path);
    Ok(())
}

/// Project override if one exists and is readable, else the built-in body.
fn task_body(
    ctx: &ProjectContext,
    task: &'static TaskTemplate,
    report: &mut GenerationReport,
) -> Cow<'static, str> {
    let path = ctx.template_override_path(task.slug);
    if !path.exists() {
        return Cow::Borrowed(task.body);
    }

    match fs::read_to_string(&path) {
        Ok(body) => {
            debug!(task = task.slug, path = %path.display(), "using template override");
            Cow::Owned(body)
        }
        Err(e) => {
            report.warn(Warning::TemplateOverrideUnreadable {
                path,
                reason: e.to_string(),
            });
            Cow::Borrowed(task.body)
        }
    }
}

fn write_capability(
    ctx: &ProjectContext,
    config: &ProjectConfig,
    profile: &TargetProfile,
    options: &GenerateOptions,
    role: &str,
    integration: &str,
    report: &mut GenerationReport,
) -> Result<()> {
    let cap = capability::get(role)
        .ok_or_else(|| KitError::ConfigurationError(format!("unknown role '{}'", role)))?;
    let integration = cap.integration(integration).ok_or_else(|| {
        KitError::ConfigurationError(format!(
            "integration '{}' is not allowed for role '{}'",
            integration, role
        ))
    })?;

    let body = template::capability_body(role)?;
    let resolved = template::resolve(body, &config.roles, profile, options.offline)
        .map_err(|e| KitError::UserError(format!("capability '{}': {}", role, e)))?;

    let artifact = Artifact::new(
        ArtifactHeader {
            name: role.to_string(),
            description: Some(cap.summary.to_string()),
            argument_hint: None,
            tools: integration.tool_pattern().map(|p| vec![p]),
        },
        resolved.content,
    );

    let path = ctx.root.join(profile.capability_path(role));
    atomic_write_file(&path, &artifact.render(profile.capability_header)?)?;
    debug!(path = %path.display(), integration = integration.id, "capability written");
    report.capabilities.push(path);
    Ok(())
}

fn deliver_connectors(
    ctx: &ProjectContext,
    config: &ProjectConfig,
    profile: &TargetProfile,
    options: &GenerateOptions,
    cli: Option<&mut dyn ConnectorCli>,
    report: &mut GenerationReport,
) -> Result<()> {
    let plan = build_connectors(connectors_for(config), options.context);
    for name in &plan.unknown {
        report.warn(Warning::UnknownConnector { name: name.clone() });
    }

    let delivered = match profile.connectors {
        ConnectorDelivery::File { path } => write_connector_file(ctx, path, &plan, report)?,
        ConnectorDelivery::CliReconciliation(spec) => match cli {
            None => {
                debug!(program = spec.program, "no connector CLI supplied");
                ConnectorDelivered::NoCli
            }
            Some(cli) => match reconcile(cli, &spec, &plan) {
                Ok(outcome) => {
                    for (connector, reason) in &outcome.failures {
                        report.warn(Warning::ConnectorRegistrationFailure {
                            connector: connector.clone(),
                            reason: reason.clone(),
                        });
                    }
                    ConnectorDelivered::Reconciled(outcome)
                }
                Err(e) => {
                    report.warn(Warning::ConnectorListFailed {
                        reason: e.to_string(),
                    });
                    ConnectorDelivered::Reconciled(ReconcileOutcome::default())
                }
            },
        },
    };
    report.connectors = delivered;
    Ok(())
}

fn write_connector_file(
    ctx: &ProjectContext,
    relative: &str,
    plan: &ConnectorPlan,
    report: &mut GenerationReport,
) -> Result<ConnectorDelivered> {
    let path = ctx.root.join(relative);

    let existing = match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            report.warn(Warning::ConnectorFileInvalid {
                path: path.clone(),
                reason: e.to_string(),
            });
            None
        }
    };

    let text = match render_connector_file(plan, existing.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            report.warn(Warning::ConnectorFileInvalid {
                path: path.clone(),
                reason: e.to_string(),
            });
            render_connector_file(plan, None).map_err(|e| {
                KitError::UserError(format!("failed to serialize connector config: {}", e))
            })?
        }
    };

    atomic_write_file(&path, &text)?;
    debug!(path = %path.display(), connectors = plan.connectors.len(), "connector file written");

    Ok(ConnectorDelivered::File {
        path,
        connectors: plan.names().map(str::to_string).collect(),
    })
}
