pub mod runtime;
pub mod target;

pub use runtime::{Language, RuntimeDescriptor, RuntimeError};
pub use target::{DeploymentTarget, Region, TargetError, validate_targets};
