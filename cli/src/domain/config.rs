//! Domain types for cf-java configuration.
//!
//! Pure data only. No I/O or filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.cf-java/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CfJavaConfig {
    /// How the `cf` CLI is invoked.
    pub cf: CfConfig,
    /// Terminal output settings.
    pub output: OutputConfig,
}

/// Settings for the `cf` subprocess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CfConfig {
    /// Program name or path of the Cloud Foundry CLI.
    pub binary: String,
    /// Timeout for API queries (`cf app`, `cf curl`, `cf apps`).
    pub query_timeout_secs: u64,
    /// Timeout for `cf ssh`. Unset waits for the remote command to finish.
    pub ssh_timeout_secs: Option<u64>,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            binary: "cf".to_string(),
            query_timeout_secs: 30,
            ssh_timeout_secs: None,
        }
    }
}

impl CfConfig {
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    #[must_use]
    pub fn ssh_timeout(&self) -> Option<Duration> {
        self.ssh_timeout_secs.map(Duration::from_secs)
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Colored output; `--no-color` and `NO_COLOR` still win.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
