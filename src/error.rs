//! Error types for the assistkit CLI.
//!
//! Only structural problems are errors. Per-item conditions met while
//! generating (a task missing a mandatory role, an unknown connector, a failed
//! registration) are recorded as [`crate::generate::Warning`] values instead.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for assistkit operations.
#[derive(Error, Debug)]
pub enum KitError {
    /// User provided invalid arguments or the project is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The project configuration references an unknown role, integration, or profile.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A referenced static template does not exist.
    #[error("Template not found: {0}")]
    TemplateMissing(String),

    /// The external connector tool could not be queried.
    #[error("Connector tool failed: {0}")]
    ConnectorError(String),
}

impl KitError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            KitError::UserError(_) => exit_codes::USER_ERROR,
            KitError::ConfigurationError(_) => exit_codes::CONFIGURATION_ERROR,
            KitError::TemplateMissing(_) => exit_codes::TEMPLATE_MISSING,
            KitError::ConnectorError(_) => exit_codes::CONNECTOR_FAILURE,
        }
    }
}

/// Result type alias for assistkit operations.
pub type Result<T> = std::result::Result<T, KitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_has_correct_exit_code() {
        let err = KitError::ConfigurationError("unknown role 'pager'".to_string());
        assert_eq!(err.exit_code(), exit_codes::CONFIGURATION_ERROR);
    }

    #[test]
    fn template_missing_has_correct_exit_code() {
        let err = KitError::TemplateMissing("deploy".to_string());
        assert_eq!(err.exit_code(), exit_codes::TEMPLATE_MISSING);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = KitError::ConfigurationError("unknown role 'pager'".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown role 'pager'");

        let err = KitError::TemplateMissing("task 'deploy'".to_string());
        assert_eq!(err.to_string(), "Template not found: task 'deploy'");

        let err = KitError::UserError("bad flag".to_string());
        assert_eq!(err.to_string(), "bad flag");
    }
}
