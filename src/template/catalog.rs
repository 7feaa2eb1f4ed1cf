//! Built-in task and capability templates.
//!
//! Task bodies use the placeholder grammar documented in [`super::conditional`]
//! and [`super::invocation`].

use crate::connector::DeploymentVariant;
use crate::error::{KitError, Result};

/// Descriptive fields of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMetadata {
    pub title: &'static str,
    pub description: &'static str,
    pub argument_hint: Option<&'static str>,
}

/// Per-context inclusion and renaming of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub excluded_in: &'static [DeploymentVariant],
    pub renamed_in: &'static [(DeploymentVariant, &'static str)],
}

impl Visibility {
    pub const ALWAYS: Visibility = Visibility {
        excluded_in: &[],
        renamed_in: &[],
    };
}

/// A reusable task instruction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub slug: &'static str,
    pub metadata: TaskMetadata,
    pub body: &'static str,
    pub visibility: Visibility,
}

impl TaskTemplate {
    /// File stem for this task in `context`, or `None` when excluded there.
    pub fn output_stem(&self, context: DeploymentVariant) -> Option<&'static str> {
        if self.visibility.excluded_in.contains(&context) {
            return None;
        }
        Some(
            self.visibility
                .renamed_in
                .iter()
                .find(|(c, _)| *c == context)
                .map(|(_, name)| *name)
                .unwrap_or(self.slug),
        )
    }
}

static TASKS: &[TaskTemplate] = &[
    TaskTemplate {
        slug: "start-ticket",
        metadata: TaskMetadata {
            title: "Start Ticket",
            description: "Pick up a ticket, plan the change, and create a working branch",
            argument_hint: Some("<ticket-id>"),
        },
        body: r#"{{requires issue_tracker}}
# Start work on $ARGUMENTS

1. Fetch ticket $ARGUMENTS from {{provider issue_tracker}} and read the description,
   acceptance criteria, and linked discussions.
2. Move the ticket to "In Progress" and assign it to yourself.
3. Write a short implementation plan as a comment on the ticket.
{{#if docs}}
4. Search {{provider docs}} for design notes related to this ticket and link them in the plan.
{{/if}}
5. Create a branch named after the ticket id.
{{#if notifier}}

When the plan is posted, let the team know:

{{invoke notifier}}
{{/if}}
"#,
        visibility: Visibility::ALWAYS,
    },
    TaskTemplate {
        slug: "verify-ui",
        metadata: TaskMetadata {
            title: "Verify UI",
            description: "Check user-facing behaviour of the current change in a real browser",
            argument_hint: Some("[url-or-flow]"),
        },
        body: r#"{{requires browser_tester}}
# Verify the UI

Target: $ARGUMENTS (default: the flows touched by the current branch).

{{invoke browser_tester}}

Report every failed expectation with the steps to reproduce it.
{{#if issue_tracker}}
Attach the report to the ticket in {{provider issue_tracker}}.
{{/if}}
"#,
        visibility: Visibility::ALWAYS,
    },
    TaskTemplate {
        slug: "explore-ui",
        metadata: TaskMetadata {
            title: "Explore UI",
            description: "Open a visible browser session and explore the app together",
            argument_hint: Some("<url>"),
        },
        body: r#"{{requires browser_tester}}
# Exploratory session

Open $ARGUMENTS in a visible browser window and narrate what you see. Pause
after every navigation so the user can steer.

{{invoke browser_tester}}
"#,
        visibility: Visibility {
            excluded_in: &[DeploymentVariant::Containerized],
            renamed_in: &[],
        },
    },
    TaskTemplate {
        slug: "ship",
        metadata: TaskMetadata {
            title: "Ship",
            description: "Finish the current branch and hand it over for review",
            argument_hint: None,
        },
        body: r#"# Ship the current branch

1. Run the full test suite and fix any failure before continuing.
{{#if code_host}}
2. Push the branch and open a pull request on {{provider code_host}}. Use the
   ticket title as the PR title and summarise the change in the description.
{{else}}
2. Push the branch and print the commands a reviewer needs to check it out.
{{/if}}
{{#if issue_tracker}}
3. Move the ticket in {{provider issue_tracker}} to "In Review" and link the change.
{{/if}}
{{#if notifier}}

Announce the change:

{{invoke notifier}}
{{/if}}
"#,
        visibility: Visibility {
            excluded_in: &[],
            renamed_in: &[(DeploymentVariant::Containerized, "ship-ci")],
        },
    },
    TaskTemplate {
        slug: "triage",
        metadata: TaskMetadata {
            title: "Triage",
            description: "Review new tickets, label them, and flag duplicates",
            argument_hint: Some("[label]"),
        },
        body: r#"{{requires issue_tracker}}
# Triage incoming tickets

List untriaged tickets in {{provider issue_tracker}} (filtered by $ARGUMENTS when given).
For each one:

- add a component label and a priority
- link obvious duplicates and close the newer one
- ask for reproduction steps when they are missing
{{#if docs}}
- link the relevant {{provider docs}} page when the ticket is a usage question
{{/if}}
{{#if notifier}}

Post the triage summary:

{{invoke notifier}}
{{/if}}
"#,
        visibility: Visibility::ALWAYS,
    },
    TaskTemplate {
        slug: "update-docs",
        metadata: TaskMetadata {
            title: "Update Docs",
            description: "Bring product documentation in line with the current branch",
            argument_hint: Some("[page]"),
        },
        body: r#"{{requires docs}}
# Update documentation

Compare the behaviour changed on this branch with the pages in {{provider docs}}
($ARGUMENTS narrows the search). Update outdated sections and add new pages
where a feature is undocumented.

{{invoke docs}}
"#,
        visibility: Visibility::ALWAYS,
    },
    TaskTemplate {
        slug: "standup",
        metadata: TaskMetadata {
            title: "Standup",
            description: "Summarise yesterday's work and today's plan",
            argument_hint: None,
        },
        body: r#"# Standup summary

Collect the commits from the last working day and group them by topic.
{{#if issue_tracker}}
Add the tickets from {{provider issue_tracker}} that changed state in the same period.
{{/if}}
{{#if code_host}}
List open pull requests on {{provider code_host}} that are waiting for review.
{{/if}}

Write three short sections: Done, Next, Blocked.
{{#if notifier}}

{{invoke notifier}}
{{/if}}
"#,
        visibility: Visibility::ALWAYS,
    },
];

/// All task templates in catalog order.
pub fn tasks() -> &'static [TaskTemplate] {
    TASKS
}

/// Look up a task template by slug.
pub fn task(slug: &str) -> Result<&'static TaskTemplate> {
    TASKS
        .iter()
        .find(|t| t.slug == slug)
        .ok_or_else(|| {
            KitError::TemplateMissing(format!(
                "task '{}' (known: {})",
                slug,
                TASKS.iter().map(|t| t.slug).collect::<Vec<_>>().join(", ")
            ))
        })
}

/// Instruction body for a capability file.
pub fn capability_body(role: &str) -> Result<&'static str> {
    let body = match role {
        "issue_tracker" => ISSUE_TRACKER_BODY,
        "notifier" => NOTIFIER_BODY,
        "browser_tester" => BROWSER_TESTER_BODY,
        "code_host" => CODE_HOST_BODY,
        "docs" => DOCS_BODY,
        other => {
            return Err(KitError::TemplateMissing(format!(
                "capability '{}'",
                other
            )));
        }
    };
    Ok(body)
}

const ISSUE_TRACKER_BODY: &str = r#"You manage tickets in {{provider issue_tracker}} for this project.

- Always quote the ticket id in your replies.
- Never close a ticket without a linked change or an explicit decision.
- Keep status transitions in order: Todo, In Progress, In Review, Done.
{{#if code_host}}
- When a pull request on {{provider code_host}} mentions a ticket, link them both ways.
{{/if}}
"#;

const NOTIFIER_BODY: &str = r#"You post updates to the team on {{provider notifier}}.

- One message per event; thread follow-ups under the first message.
- Lead with the outcome, then the link, then any action the team must take.
- Never post secrets, stack traces, or customer data.
"#;

const BROWSER_TESTER_BODY: &str = r#"You verify user-facing behaviour with {{provider browser_tester}}.

- Start every run from a clean browser context.
- Prefer role and label selectors over CSS selectors.
- Capture a screenshot for every failed expectation.
{{#if issue_tracker}}
- Attach findings to the ticket in {{provider issue_tracker}} when one is given.
{{/if}}
"#;

const CODE_HOST_BODY: &str = r#"You work with repositories on {{provider code_host}}.

- Open pull requests as drafts until the test suite passes.
- Answer review comments in the thread where they were raised.
- Never force-push a branch someone else has commented on.
"#;

const DOCS_BODY: &str = r#"You maintain product documentation in {{provider docs}}.

- Search before creating: extend an existing page when one covers the topic.
- Write for users, not implementers; link API references instead of copying them.
{{#if issue_tracker}}
- Reference the {{provider issue_tracker}} ticket that motivated each change.
{{/if}}
"#;
