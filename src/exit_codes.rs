//! Exit code constants for the assistkit CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing project)
//! - 2: Configuration error (unknown role, illegal integration)
//! - 3: Connector failure (listing or registration could not run)
//! - 4: Template missing (unknown task slug)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an uninitialized project.
pub const USER_ERROR: i32 = 1;

/// Configuration error: the project configuration references unknown roles or integrations.
pub const CONFIGURATION_ERROR: i32 = 2;

/// Connector failure: the external tool could not be queried.
pub const CONNECTOR_FAILURE: i32 = 3;

/// A referenced static template does not exist.
pub const TEMPLATE_MISSING: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            CONFIGURATION_ERROR,
            CONNECTOR_FAILURE,
            TEMPLATE_MISSING,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
