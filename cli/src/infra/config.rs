//! Infrastructure implementation of the `ConfigStore` port.
//!
//! The file location is fixed when the store is built: `AGENTDEPLOY_CONFIG`
//! when set and non-empty, else `~/.agentdeploy/config.yaml`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AgentdeployConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "AGENTDEPLOY_CONFIG";

/// Config file location from the override value and the home directory.
///
/// # Errors
///
/// Returns an error when there is no override and no home directory.
pub fn resolve_config_path(env_value: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = home.context("cannot determine home directory; set AGENTDEPLOY_CONFIG")?;
    Ok(home.join(".agentdeploy").join("config.yaml"))
}

/// `ConfigStore` over a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the location named by the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when no location can be determined.
    pub fn from_env() -> Result<Self> {
        resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::home_dir()).map(Self::at)
    }
}

/// Sibling temp file the new contents are written to before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<AgentdeployConfig> {
        if !self.path.exists() {
            return Ok(AgentdeployConfig::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(AgentdeployConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    fn save(&self, config: &AgentdeployConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        let tmp = staging_path(&self.path);
        fs::write(&tmp, content).with_context(|| format!("cannot write {}", tmp.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", tmp.display()))?;
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("cannot replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}
