//! Unit tests for cf-java
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod helpers;
mod orchestrator;
