//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::AgentdeployConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<AgentdeployConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting, returning the
/// updated configuration.
pub fn set_config_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<AgentdeployConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
