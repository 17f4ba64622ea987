//! Unit tests for the config service and YAML store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use agentdeploy_cli::application::services::config_service::{load_config, set_config_value};
use agentdeploy_cli::domain::ConfigError;

use crate::helpers::MemoryConfigStore;

#[test]
fn test_set_profile_persists() {
    let store = MemoryConfigStore::default();

    let config = set_config_value(&store, "aws.profile", "staging").expect("set");

    assert_eq!(config.aws.profile.as_deref(), Some("staging"));
    assert_eq!(store.saves.get(), 1);
    assert_eq!(
        load_config(&store).unwrap().aws.profile.as_deref(),
        Some("staging")
    );
}

#[test]
fn test_set_skip_install_parses_bool() {
    let store = MemoryConfigStore::default();

    let config = set_config_value(&store, "packaging.skip_install", "true").expect("set");

    assert!(config.packaging.skip_install);
}

#[test]
fn test_set_empty_profile_clears_it() {
    let store = MemoryConfigStore::default();
    set_config_value(&store, "aws.profile", "staging").unwrap();

    let config = set_config_value(&store, "aws.profile", "").expect("unset");

    assert!(config.aws.profile.is_none());
}

#[test]
fn test_set_unknown_key_is_rejected_without_saving() {
    let store = MemoryConfigStore::default();

    let err = set_config_value(&store, "aws.region", "us-east-1").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownKey { .. })
    ));
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn test_set_invalid_bool_is_rejected_without_saving() {
    let store = MemoryConfigStore::default();

    let err = set_config_value(&store, "packaging.skip_install", "yes").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(store.saves.get(), 0);
}
