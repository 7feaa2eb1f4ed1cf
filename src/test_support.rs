use crate::config::ProjectConfig;
use crate::connector::{ConnectorCli, RegistrationCommand};
use crate::context::ProjectContext;
use crate::error::{KitError, Result};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A temporary project with a saved configuration.
pub(crate) fn create_test_project(profile: &str, roles: &[(&str, &str)]) -> (TempDir, ProjectContext, ProjectConfig) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = ProjectContext::at(temp_dir.path());

    let mut config = ProjectConfig::new("storefront");
    config.target_profile = profile.to_string();
    for (role, integration) in roles {
        config.assign(role, integration).unwrap();
    }
    config.normalize();
    config.save(ctx.config_path()).unwrap();

    (temp_dir, ctx, config)
}

/// In-memory connector registry recording every registration.
#[derive(Default)]
pub(crate) struct RecordingCli {
    pub(crate) listed: Vec<String>,
    pub(crate) list_error: Option<String>,
    pub(crate) fail_on: Vec<String>,
    pub(crate) commands: Vec<RegistrationCommand>,
}

impl ConnectorCli for RecordingCli {
    fn list_registered(&mut self) -> Result<Vec<String>> {
        match &self.list_error {
            Some(reason) => Err(KitError::ConnectorError(reason.clone())),
            None => Ok(self.listed.clone()),
        }
    }

    fn register(&mut self, command: &RegistrationCommand) -> std::result::Result<(), String> {
        self.commands.push(command.clone());
        if self.fail_on.contains(&command.connector) {
            return Err("exit code 1: permission denied".to_string());
        }
        self.listed.push(format!("{}-{}", crate::connector::CONNECTOR_NAMESPACE, command.connector));
        Ok(())
    }
}
