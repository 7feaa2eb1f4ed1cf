//! Generated artifact model.
//!
//! An artifact is one generated task or capability file: a small metadata
//! header plus resolved markdown content. Profiles choose between two
//! physical representations.
//!
//! # Structured header
//!
//! YAML frontmatter delimited by `---` lines:
//!
//! ```text
//! ---
//! name: issue_tracker
//! description: Reads and updates tickets in the project's issue tracker
//! tools: mcp__linear__*
//! ---
//! You manage tickets in Linear for this project.
//! ```
//!
//! # Plain
//!
//! ```text
//! # Pick up a ticket, plan the change, and create a working branch
//! Arguments: <ticket-id>
//!
//! # Start work on $ARGUMENTS
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

mod io;

/// Header fields of a generated file.
///
/// Undefined fields are omitted from the rendered header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// File stem: the task slug (or its rename) or the capability role.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "argument-hint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub argument_hint: Option<String>,

    /// Tool wildcards the file may use; rendered comma-joined.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "join_list",
        deserialize_with = "split_list"
    )]
    pub tools: Option<Vec<String>>,
}

/// A header plus resolved content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub header: ArtifactHeader,
    pub content: String,
}

impl Artifact {
    pub fn new(header: ArtifactHeader, content: impl Into<String>) -> Self {
        Self {
            header,
            content: content.into(),
        }
    }
}

fn join_list<S: Serializer>(
    list: &Option<Vec<String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match list {
        Some(items) => serializer.serialize_str(&items.join(", ")),
        None => serializer.serialize_none(),
    }
}

fn split_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }))
}
