//! Pass 1: mandatory-role markers, role-conditional blocks, and role wording.
//!
//! Grammar (blocks do not nest):
//!
//! ```text
//! {{requires issue_tracker}}          line removed; fails if the role is unassigned
//! {{#if notifier}}...{{/if}}          kept only when the role is assigned
//! {{#if notifier}}...{{else}}...{{/if}}
//! {{provider notifier}}               provider name, or the capability name if unassigned
//! {{integration notifier}}            integration id, or the capability name if unassigned
//! ```
//!
//! `{{invoke ROLE}}` tokens are left untouched for pass 2.

use crate::capability::{self, Integration};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static REQUIRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\{\{requires ([a-z_]+)\}\}[ \t]*(?:\r?\n)?").expect("valid regex")
});

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if ([a-z_]+)\}\}(.*?)(?:\{\{else\}\}(.*?))?\{\{/if\}\}(\n?)")
        .expect("valid regex")
});

static WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(provider|integration) ([a-z_]+)\}\}").expect("valid regex")
});

/// Any pass-1 token.
pub(crate) static PASS_ONE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(?:requires [a-z_]+|#if [a-z_]+|else|/if|provider [a-z_]+|integration [a-z_]+)\}\}")
        .expect("valid regex")
});

/// A template needs a role the configuration does not assign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    pub role: String,
}

impl fmt::Display for MissingCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requires unconfigured role '{}'", self.role)
    }
}

/// Roles named by `{{requires ROLE}}` markers, in order of appearance.
pub fn required_roles(content: &str) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for caps in REQUIRES.captures_iter(content) {
        if !roles.iter().any(|r| r == &caps[1]) {
            roles.push(caps[1].to_string());
        }
    }
    roles
}

/// Resolve markers, conditional blocks, and wording against role assignments.
///
/// Fails with the first required role that is not assigned.
pub fn resolve_conditionals(
    content: &str,
    roles: &BTreeMap<String, String>,
) -> Result<String, MissingCapability> {
    if let Some(role) = required_roles(content)
        .into_iter()
        .find(|r| !roles.contains_key(r))
    {
        return Err(MissingCapability { role });
    }

    let without_markers = REQUIRES.replace_all(content, "");
    let blocks = replace_blocks(&without_markers, |role| roles.contains_key(role));
    Ok(replace_wording(&blocks, |role| assigned(roles, role)))
}

/// Base content used when resolution fails.
///
/// Markers are dropped, every block collapses to its `{{else}}` branch (or to
/// nothing), and wording uses capability names.
pub fn base_content(content: &str) -> String {
    let without_markers = REQUIRES.replace_all(content, "");
    let blocks = replace_blocks(&without_markers, |_| false);
    replace_wording(&blocks, |_| None)
}

fn assigned(roles: &BTreeMap<String, String>, role: &str) -> Option<&'static Integration> {
    roles
        .get(role)
        .and_then(|id| capability::integration(role, id))
}

fn replace_blocks(content: &str, is_assigned: impl Fn(&str) -> bool) -> String {
    BLOCK
        .replace_all(content, |caps: &Captures| {
            let body = if is_assigned(&caps[1]) {
                caps.get(2).map_or("", |m| m.as_str())
            } else {
                caps.get(3).map_or("", |m| m.as_str())
            };

            // Block form: tags on their own lines. Drop the newline after the
            // opening tag and the one after the closing tag.
            let block_form = caps[2].starts_with('\n');
            let mut out = if block_form {
                body.strip_prefix('\n').unwrap_or(body).to_string()
            } else {
                body.to_string()
            };
            if !block_form {
                out.push_str(&caps[4]);
            }
            out
        })
        .into_owned()
}

fn replace_wording(
    content: &str,
    lookup: impl Fn(&str) -> Option<&'static Integration>,
) -> String {
    WORDING
        .replace_all(content, |caps: &Captures| {
            let role = &caps[2];
            match lookup(role) {
                Some(integration) if &caps[1] == "provider" => integration.provider.to_string(),
                Some(integration) => integration.id.to_string(),
                None => capability::get(role)
                    .map(|c| c.display_name.to_string())
                    .unwrap_or_else(|| role.replace('_', " ")),
            }
        })
        .into_owned()
}
