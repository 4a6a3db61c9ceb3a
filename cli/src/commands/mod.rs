//! Command implementations

pub mod diagnose;
pub mod list;
