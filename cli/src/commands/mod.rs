//! Command implementations

pub mod config;
pub mod doctor;
pub mod package;
pub mod preflight;
pub mod version;
