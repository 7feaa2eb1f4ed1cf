//! External tool connectors.
//!
//! - **Descriptor**: static table of connector servers
//! - **Builder**: per-variant connector configs and file-mode rendering
//! - **Reconcile**: CLI-mode registration of missing connectors
//! - **Runner**: process-backed access to the assistant CLI

mod builder;
mod descriptor;
mod reconcile;
mod runner;

pub use builder::{
    ConnectorPlan, build_connectors, connectors_for, missing_secrets, render_connector_file,
};
pub use descriptor::DeploymentVariant;
pub use reconcile::{
    CONNECTOR_NAMESPACE, ConnectorCli, ReconcileOutcome, RegistrationCommand, reconcile,
    registration_command,
};
pub use runner::ProcessConnectorCli;
