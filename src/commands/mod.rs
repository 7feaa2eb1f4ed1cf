//! Command implementations for assistkit.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod connectors;
mod eject;
mod generate;
mod init;
mod listing;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(args),
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Connectors(args) => connectors::cmd_connectors(args),
        Command::Capabilities => listing::cmd_capabilities(),
        Command::Profiles => listing::cmd_profiles(),
        Command::Eject(args) => eject::cmd_eject(args),
    }
}
