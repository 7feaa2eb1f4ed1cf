//! Project context resolution for assistkit.
//!
//! A project is any directory containing a `.assistkit/` state directory.
//! Commands may be invoked from any subdirectory; resolution walks up to the
//! nearest ancestor that holds one.

use crate::error::{KitError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// State directory name, relative to the project root.
pub const STATE_DIR: &str = ".assistkit";

/// Project configuration file name within the state directory.
pub const CONFIG_FILE: &str = "project.yaml";

/// Event log file name within the state directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Template override directory name within the state directory.
pub const TEMPLATES_DIR: &str = "templates";

/// Resolved paths for one project. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Directory generated files are written relative to.
    pub root: PathBuf,

    /// `{root}/.assistkit/`
    pub state_dir: PathBuf,
}

impl ProjectContext {
    /// Context rooted at `root`, whether or not it is initialized.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let state_dir = root.join(STATE_DIR);
        Self { root, state_dir }
    }

    /// Resolve the project containing the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            KitError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Self::resolve_from(&cwd)
    }

    /// Resolve the project containing `start`.
    ///
    /// Fails with a user error when no ancestor holds a state directory.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = start.as_ref();
        start
            .ancestors()
            .find(|dir| dir.join(STATE_DIR).is_dir())
            .map(Self::at)
            .ok_or_else(|| {
                KitError::UserError(format!(
                    "no assistkit project found in '{}' or any parent directory.\n\n\
                     Run `assistkit init` to create one.",
                    start.display()
                ))
            })
    }

    pub fn is_initialized(&self) -> bool {
        self.config_path().is_file()
    }

    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join(CONFIG_FILE)
    }

    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join(EVENTS_FILE)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.state_dir.join(TEMPLATES_DIR)
    }

    /// Override file for a task slug.
    pub fn template_override_path(&self, slug: &str) -> PathBuf {
        self.templates_dir().join(format!("{}.md", slug))
    }
}
