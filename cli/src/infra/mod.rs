//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the `cf`
//! CLI adapter, filesystem access, configuration and token generation.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cf_cli;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod tokens;
