//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app_env;
pub mod artifact;
pub mod catalog;
pub mod config;
pub mod error;
pub mod invocation;
pub mod shell;
pub mod substitution;
pub mod template;
pub mod token;
pub mod tools;

pub use artifact::{ExactThenNewest, LocateOutcome, LocateStrategy, RemoteArtifact};
pub use catalog::{ArtifactMode, CATALOG, Catalog, OperationDescriptor};
pub use config::CfJavaConfig;
pub use error::{DiagnosticError, ErrorKind, SubstitutionError};
pub use invocation::Invocation;
pub use substitution::{Bindings, substitute};
pub use template::{Placeholder, Template};
