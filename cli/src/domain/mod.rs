//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod packaging;
pub mod platform;
pub mod requirements;
pub mod stack;

pub use config::{AgentdeployConfig, validate_config_key, validate_config_value};
pub use diagnostics::{format_error, format_panic_payload};
pub use error::{ConfigError, PackagingError, StackQueryError, is_stack_not_found};
pub use platform::{PlatformIssue, detect_unavailable_platform};
pub use stack::{
    BlockingStack, BootstrapStatus, StackDescription, StackState, StackStatusResult,
    TOOLKIT_STACK_NAME, classify_status,
};
