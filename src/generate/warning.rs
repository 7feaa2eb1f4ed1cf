//! Recoverable per-item conditions met during a pass.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A task needs a role the project has not assigned; base content was written.
    MissingCapability { task: String, role: String },
    /// A connector name with no descriptor was skipped.
    UnknownConnector { name: String },
    /// One connector could not be registered; the rest of the batch ran.
    ConnectorRegistrationFailure { connector: String, reason: String },
    /// The assistant CLI could not list registered connectors; nothing was registered.
    ConnectorListFailed { reason: String },
    /// A template override exists but could not be read; the built-in was used.
    TemplateOverrideUnreadable { path: PathBuf, reason: String },
    /// A template override left unresolved syntax; the built-in was used.
    TemplateOverrideInvalid { task: String, reason: String },
    /// An existing connector file was unreadable or not JSON; it was replaced.
    ConnectorFileInvalid { path: PathBuf, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingCapability { task, role } => write!(
                f,
                "task '{}' requires role '{}', which is not configured; wrote base content",
                task, role
            ),
            Warning::UnknownConnector { name } => {
                write!(f, "unknown connector '{}' skipped", name)
            }
            Warning::ConnectorRegistrationFailure { connector, reason } => {
                write!(f, "failed to register connector '{}': {}", connector, reason)
            }
            Warning::ConnectorListFailed { reason } => {
                write!(f, "could not list registered connectors: {}", reason)
            }
            Warning::TemplateOverrideUnreadable { path, reason } => write!(
                f,
                "template override '{}' is unreadable ({}); using built-in template",
                path.display(),
                reason
            ),
            Warning::TemplateOverrideInvalid { task, reason } => write!(
                f,
                "template override for task '{}' is malformed ({}); using built-in template",
                task, reason
            ),
            Warning::ConnectorFileInvalid { path, reason } => write!(
                f,
                "existing connector file '{}' was replaced: {}",
                path.display(),
                reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capability_names_task_and_role() {
        let warning = Warning::MissingCapability {
            task: "triage".to_string(),
            role: "issue_tracker".to_string(),
        };
        let text = warning.to_string();
        assert!(text.contains("'triage'"));
        assert!(text.contains("'issue_tracker'"));
    }

    #[test]
    fn test_registration_failure_includes_reason() {
        let warning = Warning::ConnectorRegistrationFailure {
            connector: "slack".to_string(),
            reason: "exit code 1: denied".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "failed to register connector 'slack': exit code 1: denied"
        );
    }
}
