//! Task and capability template resolution.
//!
//! Resolution runs in two explicit passes:
//!
//! 1. [`resolve_conditionals`]: mandatory-role markers, conditional blocks,
//!    and role wording. A missing mandatory role is a typed failure.
//! 2. [`substitute_invocations`]: `{{invoke ROLE}}` tokens become the target
//!    profile's delegation text.
//!
//! [`resolve`] chains both and never fails for a missing role: it falls back
//! to [`base_content`] and hands the [`MissingCapability`] back to the caller.

mod catalog;
mod conditional;
mod invocation;
mod vars;


pub use catalog::{TaskTemplate, capability_body, task, tasks};
pub use conditional::MissingCapability;
pub use invocation::ResidualToken;

use conditional::{base_content, resolve_conditionals};
use invocation::substitute_invocations;

use crate::profile::TargetProfile;
use std::collections::BTreeMap;

/// Result of resolving one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub content: String,
    /// Set when a mandatory role was missing and base content was used.
    pub missing: Option<MissingCapability>,
}

/// Run both passes over `body`.
///
/// Only malformed template syntax is an error.
pub fn resolve(
    body: &str,
    roles: &BTreeMap<String, String>,
    profile: &TargetProfile,
    offline: bool,
) -> Result<Resolved, ResidualToken> {
    let (pass_one, missing) = match resolve_conditionals(body, roles) {
        Ok(content) => (content, None),
        Err(missing) => (base_content(body), Some(missing)),
    };
    let content = substitute_invocations(&pass_one, profile, offline)?;
    Ok(Resolved { content, missing })
}
