//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document on disk.
//!
//! - A missing file loads as [`AppConfig::default()`].
//! - Every load and save runs [`AppConfig::validate`]; invalid values are
//!   rejected, not clamped.
//! - Saves write a sibling `.tmp` file and rename it over the target.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::AppConfig;

pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPort for FileConfig {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("FileConfig: {} not found, using defaults", self.path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => {
                warn!("FileConfig: read {} failed: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let cfg: AppConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("FileConfig: {} is not valid config JSON: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        info!("FileConfig: loaded {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| {
            warn!("FileConfig: write {} failed: {}", tmp.display(), e);
            ConfigError::IoError
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            warn!("FileConfig: rename to {} failed: {}", self.path.display(), e);
            ConfigError::IoError
        })?;
        info!("FileConfig: saved {}", self.path.display());
        Ok(())
    }
}
