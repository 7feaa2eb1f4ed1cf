//! Pass 2: replace `{{invoke ROLE}}` tokens with profile instruction text.

use super::conditional::PASS_ONE_TOKEN;
use super::vars::{render_template, vars};
use crate::capability::{self, NOTIFIER_ROLE};
use crate::profile::{InvocationStyle, TargetProfile};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

static INVOKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{invoke ([a-z_]+)\}\}").expect("valid regex"));

/// Inline notification text, used when the assistant has no network access.
const INLINE_NOTIFICATION: &str = "Do not start another process for this step. Write the \
message for the {display_name} as a `## Notification` section at the end of your reply \
so it can be posted once the session is back online.";

/// A token of the placeholder grammar survived substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualToken {
    pub token: String,
}

impl fmt::Display for ResidualToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved placeholder '{}' after substitution", self.token)
    }
}

/// Instruction text delegating to `role` under `profile`.
///
/// `offline` selects the inline variant for the notifier role only.
pub fn invocation_text(profile: &TargetProfile, role: &str, offline: bool) -> String {
    let display_name = capability::get(role)
        .map(|c| c.display_name.to_string())
        .unwrap_or_else(|| role.replace('_', " "));

    let file = profile.capability_path(role).to_string_lossy().replace('\\', "/");
    let variables = vars([
        ("role", role.to_string()),
        ("display_name", display_name),
        ("file", file),
    ]);

    let template = if offline && role == NOTIFIER_ROLE {
        INLINE_NOTIFICATION
    } else {
        match profile.invocation {
            InvocationStyle::Delegation { template } => template,
            InvocationStyle::ExternalProcess { template } => template,
        }
    };

    render_template(template, &variables).unwrap_or_else(|e| {
        warn!(profile = profile.id, role, error = %e, "invocation template failed to render");
        template.to_string()
    })
}

/// Replace every invocation token.
///
/// Fails if any token of either pass survives, which would mean malformed
/// template syntax.
pub fn substitute_invocations(
    content: &str,
    profile: &TargetProfile,
    offline: bool,
) -> Result<String, ResidualToken> {
    let out = INVOKE
        .replace_all(content, |caps: &Captures| {
            invocation_text(profile, &caps[1], offline)
        })
        .into_owned();

    if let Some(m) = find_residual(&out) {
        return Err(ResidualToken { token: m });
    }
    Ok(out)
}

/// The first placeholder token of either pass still present in `content`.
pub fn find_residual(content: &str) -> Option<String> {
    INVOKE
        .find(content)
        .or_else(|| PASS_ONE_TOKEN.find(content))
        .map(|m| m.as_str().to_string())
}
