//! Project configuration for assistkit.
//!
//! This module defines the `ProjectConfig` struct stored in
//! `.assistkit/project.yaml`. It supports forward-compatible YAML parsing
//! (unknown fields are preserved), defaults for optional fields, automatic
//! assignment of required single-integration roles, and validation of every
//! role assignment against the capability registry.

mod model;
mod operations;


pub use model::{CURRENT_SCHEMA_VERSION, ProjectConfig};
pub use operations::parse_assignment;
