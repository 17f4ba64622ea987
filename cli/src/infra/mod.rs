//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, local
//! filesystem staging and archiving, remote stack queries, and config files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod artifact_fs;
pub mod cloudformation;
pub mod command_runner;
pub mod config;
