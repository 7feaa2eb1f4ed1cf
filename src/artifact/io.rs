//! Rendering and parsing of artifact files.

use super::{Artifact, ArtifactHeader};
use crate::error::{KitError, Result};

const DELIMITER: &str = "---";

impl Artifact {
    /// Render the file text, with a structured header or in plain form.
    pub fn render(&self, structured: bool) -> Result<String> {
        if structured {
            self.render_structured()
        } else {
            Ok(self.render_plain())
        }
    }

    fn render_structured(&self) -> Result<String> {
        let header_yaml = serde_yaml::to_string(&self.header).map_err(|e| {
            KitError::UserError(format!(
                "failed to serialize header of '{}': {}",
                self.header.name, e
            ))
        })?;

        let mut output = String::new();
        output.push_str(DELIMITER);
        output.push('\n');
        output.push_str(&header_yaml);
        output.push_str(DELIMITER);
        output.push('\n');
        output.push_str(&self.content);
        Ok(output)
    }

    fn render_plain(&self) -> String {
        let mut output = String::new();
        if let Some(description) = &self.header.description {
            output.push_str("# ");
            output.push_str(&single_line(description));
            output.push('\n');
        }
        if let Some(hint) = &self.header.argument_hint {
            output.push_str("Arguments: ");
            output.push_str(&single_line(hint));
            output.push('\n');
        }
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.content);
        output
    }

    /// Parse a file rendered with a structured header.
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self> {
        let rest = text
            .strip_prefix(DELIMITER)
            .and_then(|r| r.strip_prefix('\n'))
            .ok_or_else(|| {
                KitError::UserError("artifact must start with a '---' header delimiter".to_string())
            })?;

        // The header is empty or ends with a newline, so the closing
        // delimiter is either first or follows a newline.
        let (header_yaml, content) = if let Some(content) = rest.strip_prefix("---\n") {
            ("", content)
        } else {
            let pos = rest.find("\n---\n").ok_or_else(|| {
                KitError::UserError("artifact header is missing its closing '---'".to_string())
            })?;
            (&rest[..=pos], &rest[pos + 5..])
        };

        let header: ArtifactHeader = serde_yaml::from_str(header_yaml)
            .map_err(|e| KitError::UserError(format!("failed to parse artifact header: {}", e)))?;

        Ok(Self {
            header,
            content: content.to_string(),
        })
    }
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
