//! Append-only event log.
//!
//! Events are stored as NDJSON (one JSON object per line) in
//! `.assistkit/events.ndjson`, outside every generated directory.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `init`, `generate`, `eject`, or `register_connector`
//! - `actor`: `user@HOST`
//! - `details`: action-specific object
//!
//! Command handlers build an [`Event`], attach details with
//! [`Event::with_details`], and hand it to [`append_event`].

use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Project configuration created
    Init,
    /// Regeneration pass completed
    Generate,
    /// Built-in template copied for override
    Eject,
    /// Connector registered with an assistant CLI
    RegisterConnector,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Generate => write!(f, "generate"),
            EventAction::Eject => write!(f, "eject"),
            EventAction::RegisterConnector => write!(f, "register_connector"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    /// e.g. `user@HOST`
    pub actor: String,
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| KitError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append one event line, creating the log (and state directory) if needed.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_path();
    let json_line = event.to_ndjson_line()?;

    fs::create_dir_all(&ctx.state_dir).map_err(|e| {
        KitError::UserError(format!(
            "failed to create state directory '{}': {}",
            ctx.state_dir.display(),
            e
        ))
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            KitError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        KitError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        KitError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}
