//! Process-backed [`ConnectorCli`] implementation.

use super::reconcile::{ARG_SEPARATOR, ConnectorCli, RegistrationCommand};
use crate::error::{KitError, Result};
use crate::profile::ConnectorCliSpec;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::LazyLock;
use tracing::debug;

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// Runs the assistant CLI to list and register connectors.
pub struct ProcessConnectorCli {
    spec: ConnectorCliSpec,
    cwd: PathBuf,
    /// Values for `$VAR` references in env flags.
    env: HashMap<String, String>,
    /// Print registration commands instead of running them.
    dry_run: bool,
}

impl ProcessConnectorCli {
    pub fn new(spec: ConnectorCliSpec, cwd: PathBuf, env: HashMap<String, String>) -> Self {
        Self {
            spec,
            cwd,
            env,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn run(&self, args: &[String]) -> std::io::Result<Output> {
        Command::new(self.spec.program)
            .current_dir(&self.cwd)
            .args(args)
            .output()
    }
}

impl ConnectorCli for ProcessConnectorCli {
    fn list_registered(&mut self) -> Result<Vec<String>> {
        let args: Vec<String> = self.spec.list_args.iter().map(|a| a.to_string()).collect();
        let output = self.run(&args).map_err(|e| {
            KitError::ConnectorError(format!(
                "failed to execute {} {}: {}\n\
                 Fix: ensure the command is installed and in PATH.",
                self.spec.program,
                args.join(" "),
                e
            ))
        })?;

        if !output.status.success() {
            return Err(KitError::ConnectorError(format!(
                "{} {} failed (exit code {}): {}",
                self.spec.program,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn register(&mut self, command: &RegistrationCommand) -> std::result::Result<(), String> {
        if self.dry_run {
            println!("{}", command.display(self.spec.program));
            return Ok(());
        }

        let args = expand_flags(&command.args, &self.env)?;
        debug!(command = %command.display(self.spec.program), "registering connector");

        let output = self
            .run(&args)
            .map_err(|e| format!("failed to execute {}: {}", self.spec.program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ))
        }
    }
}

/// Expand `$VAR` references in arguments before the separator.
///
/// Arguments after the separator belong to the connector's own command line
/// and are passed through untouched. An unset variable is an error naming it.
pub fn expand_flags(
    args: &[String],
    env: &HashMap<String, String>,
) -> std::result::Result<Vec<String>, String> {
    let mut expanded = Vec::with_capacity(args.len());
    let mut missing = Vec::new();
    let mut past_separator = false;

    for arg in args {
        if past_separator {
            expanded.push(arg.clone());
            continue;
        }
        if arg == ARG_SEPARATOR {
            past_separator = true;
            expanded.push(arg.clone());
            continue;
        }

        let value = ENV_REFERENCE.replace_all(arg, |caps: &regex::Captures| {
            match env.get(&caps[1]) {
                Some(v) => v.clone(),
                None => {
                    missing.push(caps[1].to_string());
                    caps[0].to_string()
                }
            }
        });
        expanded.push(value.into_owned());
    }

    if missing.is_empty() {
        Ok(expanded)
    } else {
        Err(format!("missing secret(s): {}", missing.join(", ")))
    }
}
