//! Connector configuration builder.

use super::descriptor::{self, DeploymentVariant};
use crate::capability;
use crate::config::ProjectConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Top-level key holding connector entries in file-mode config files.
pub const SERVERS_KEY: &str = "mcpServers";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Configuration for one connector, ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Values keep their `${VAR}` placeholders.
    pub env: BTreeMap<String, String>,
}

/// Connector configurations built for one deployment variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorPlan {
    pub connectors: BTreeMap<String, ConnectorConfig>,
    /// Requested names with no descriptor; skipped.
    pub unknown: Vec<String>,
}

impl ConnectorPlan {
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.connectors.keys().map(String::as_str)
    }

    /// Variable names referenced by `${VAR}` placeholders, sorted and deduplicated.
    pub fn required_secrets(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for config in self.connectors.values() {
            for value in config.env.values() {
                for caps in PLACEHOLDER.captures_iter(value) {
                    names.insert(caps[1].to_string());
                }
            }
        }
        names.into_iter().collect()
    }
}

/// Build configuration objects for the named connectors.
///
/// Unknown names are dropped and listed in [`ConnectorPlan::unknown`]; this
/// function never fails.
pub fn build_connectors<I, S>(names: I, variant: DeploymentVariant) -> ConnectorPlan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut plan = ConnectorPlan::default();

    for name in names {
        let name = name.as_ref();
        let Some(descriptor) = descriptor::get(name) else {
            warn!(connector = name, "unknown connector skipped");
            plan.unknown.push(name.to_string());
            continue;
        };

        let mut args: Vec<String> = descriptor.args.iter().map(|a| a.to_string()).collect();
        args.extend(descriptor.extra_args(variant).iter().map(|a| a.to_string()));

        let env = descriptor
            .env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        debug!(connector = name, %variant, "connector configured");
        plan.connectors.insert(
            name.to_string(),
            ConnectorConfig {
                command: descriptor.command.to_string(),
                args,
                env,
            },
        );
    }

    plan
}

/// Connector names needed by a project's role assignments, sorted.
pub fn connectors_for(config: &ProjectConfig) -> BTreeSet<String> {
    config
        .roles
        .iter()
        .filter_map(|(role, id)| capability::integration(role, id))
        .filter_map(|i| i.connector)
        .map(str::to_string)
        .collect()
}

/// Render the file-mode connector config.
///
/// When `existing` holds a JSON object its other top-level keys are kept and
/// only the servers map is replaced. Keys come out sorted, pretty-printed
/// with two-space indentation and a trailing newline.
pub fn render_connector_file(
    plan: &ConnectorPlan,
    existing: Option<&str>,
) -> serde_json::Result<String> {
    let mut root = match existing.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(map))) => map,
        Some(Err(e)) => return Err(e),
        _ => Map::new(),
    };

    root.insert(SERVERS_KEY.to_string(), serde_json::to_value(&plan.connectors)?);

    let mut out = serde_json::to_string_pretty(&Value::Object(root))?;
    out.push('\n');
    Ok(out)
}

/// Names from `required` that are not set in `env`.
pub fn missing_secrets(required: &[String], env: &HashMap<String, String>) -> Vec<String> {
    required
        .iter()
        .filter(|name| env.get(*name).is_none_or(|v| v.is_empty()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_connector_dropped() {
        let plan = build_connectors(["playwright", "unknown-x"], DeploymentVariant::Local);

        assert_eq!(plan.names().collect::<Vec<_>>(), vec!["playwright"]);
        assert_eq!(plan.unknown, vec!["unknown-x"]);
    }

    #[test]
    fn test_containerized_appends_variant_args() {
        let local = build_connectors(["playwright"], DeploymentVariant::Local);
        let container = build_connectors(["playwright"], DeploymentVariant::Containerized);

        assert_eq!(
            local.connectors["playwright"].args,
            vec!["-y", "@playwright/mcp@latest"]
        );
        assert_eq!(
            container.connectors["playwright"].args,
            vec!["-y", "@playwright/mcp@latest", "--headless", "--isolated"]
        );
    }

    #[test]
    fn test_env_stays_symbolic() {
        let plan = build_connectors(["slack"], DeploymentVariant::Local);
        let env = &plan.connectors["slack"].env;
        assert_eq!(env["SLACK_BOT_TOKEN"], "${SLACK_BOT_TOKEN}");
        assert_eq!(env["SLACK_TEAM_ID"], "${SLACK_TEAM_ID}");
    }

    #[test]
    fn test_required_secrets_sorted_and_deduplicated() {
        let plan = build_connectors(["slack", "github", "linear"], DeploymentVariant::Local);
        assert_eq!(
            plan.required_secrets(),
            vec!["GITHUB_PERSONAL_ACCESS_TOKEN", "SLACK_BOT_TOKEN", "SLACK_TEAM_ID"]
        );
    }

    #[test]
    fn test_missing_secrets() {
        let required = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let env = HashMap::from([
            ("A".to_string(), "set".to_string()),
            ("C".to_string(), String::new()),
        ]);
        assert_eq!(missing_secrets(&required, &env), vec!["B", "C"]);
    }

    #[test]
    fn test_render_connector_file_shape() {
        let plan = build_connectors(["linear"], DeploymentVariant::Local);
        let rendered = render_connector_file(&plan, None).unwrap();

        let expected = r#"{
  "mcpServers": {
    "linear": {
      "args": [
        "-y",
        "mcp-remote",
        "https://mcp.linear.app/sse"
      ],
      "command": "npx",
      "env": {}
    }
  }
}
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_connector_file_preserves_other_keys() {
        let existing = r#"{"theme": "dark", "mcpServers": {"stale": {"command": "x"}}}"#;
        let plan = build_connectors(["slack"], DeploymentVariant::Local);
        let rendered = render_connector_file(&plan, Some(existing)).unwrap();

        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["theme"], "dark");
        assert!(value[SERVERS_KEY].get("stale").is_none());
        assert_eq!(value[SERVERS_KEY]["slack"]["command"], "npx");
    }

    #[test]
    fn test_render_connector_file_rejects_invalid_existing() {
        let plan = ConnectorPlan::default();
        assert!(render_connector_file(&plan, Some("{not json")).is_err());
    }

    #[test]
    fn test_connectors_for_config() {
        let yaml = r#"
project_name: demo
roles:
  issue_tracker: jira
  docs: confluence
  code_host: github
"#;
        let config = ProjectConfig::from_yaml(yaml).unwrap();
        let names: Vec<_> = connectors_for(&config).into_iter().collect();
        assert_eq!(names, vec!["atlassian", "github", "playwright"]);
    }
}
