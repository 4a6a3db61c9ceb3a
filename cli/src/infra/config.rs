//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::CfJavaConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "CF_JAVA_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Use `path` instead of the environment or home-directory default.
    #[must_use]
    pub fn with_path(path: Option<PathBuf>) -> Self {
        Self { explicit: path }
    }

    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".cf-java").join("config.yaml"))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<CfJavaConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(CfJavaConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}
