//! Filesystem infrastructure — implements the `LocalFs` port.

use std::path::Path;

use anyhow::{Context, Result};

/// Production filesystem implementation of `LocalFs`, backed by `tokio::fs`.
pub struct TokioLocalFs;

impl crate::application::ports::LocalFs for TokioLocalFs {
    type File = tokio::fs::File;

    async fn create(&self, path: &Path) -> Result<tokio::fs::File> {
        tokio::fs::File::create(path)
            .await
            .with_context(|| format!("creating file {}", path.display()))
    }
}
