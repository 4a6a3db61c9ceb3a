//! Remote artifacts and the strategy used to find them.
//!
//! A runtime may ignore the file name it was asked to write (jvmmon always
//! writes `java_pid<N>.hprof`), so locating an artifact is a remote probe
//! followed by local interpretation of its output.

use std::path::PathBuf;

use crate::domain::shell::quote;

/// Seconds between two size samples while waiting for a file to settle.
pub const STABILIZE_INTERVAL_SECS: u32 = 3;

/// A file produced inside the application container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    pub remote_path: String,
    /// Set once the file has been copied to the local machine.
    pub local_path: Option<PathBuf>,
}

impl RemoteArtifact {
    #[must_use]
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
            local_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    Found(RemoteArtifact),
    NotFound,
}

/// Pluggable artifact lookup.
pub trait LocateStrategy {
    /// Remote shell command whose output identifies the artifact.
    fn probe(&self) -> String;

    /// Extract the artifact path from the probe output, if any.
    fn interpret(&self, output: &[String]) -> Option<String>;
}

/// Use the expected path when it exists, otherwise the newest file in
/// `search_dir` matching `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactThenNewest {
    pub expected: String,
    pub search_dir: String,
    pub pattern: String,
    /// Poll the found file until its size stops changing.
    pub await_stable: bool,
}

impl LocateStrategy for ExactThenNewest {
    fn probe(&self) -> String {
        let expected = quote(&self.expected);
        let find = format!(
            "[ -f {expected} ] && echo {expected} || find {dir} -name {pattern} -printf '%T@ %p\\0' \
             | sort -zk 1nr | sed -z 's/^[^ ]* //' | tr '\\0' '\\n' | head -n 1",
            dir = quote(&self.search_dir),
            pattern = quote(&self.pattern),
        );
        if !self.await_stable {
            return find;
        }
        format!(
            "FOUND=$({find}); \
             if [ -n \"${{FOUND}}\" ]; then \
             SIZE=-1; OLD_SIZE=$(stat -c '%s' \"${{FOUND}}\"); \
             while [ \"${{SIZE}}\" != \"${{OLD_SIZE}}\" ]; do \
             OLD_SIZE=${{SIZE}}; sleep {STABILIZE_INTERVAL_SECS}; SIZE=$(stat -c '%s' \"${{FOUND}}\"); done; \
             echo \"${{FOUND}}\"; fi"
        )
    }

    fn interpret(&self, output: &[String]) -> Option<String> {
        output
            .iter()
            .map(|line| line.trim())
            .rfind(|line| !line.is_empty())
            .map(str::to_string)
    }
}
