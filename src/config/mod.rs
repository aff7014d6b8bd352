//! Configuration loading.
//!
//! Settings live in `~/.taskdeck/config.yaml`. A missing file yields the
//! defaults; a malformed file is an error, never a silent fallback.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Picker presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Rows visible at once in selection overlays.
    pub window_size: usize,
    /// Show the ▲/▼ scroll affordances.
    pub scroll_arrows: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            scroll_arrows: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where checkpoint files live. Defaults to `<home>/checkpoints`.
    pub checkpoint_dir: Option<PathBuf>,
    pub picker: PickerConfig,
}

impl Config {
    /// Load from `<home>/config.yaml`, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let path = home_dir()?.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config at {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Resolved checkpoint directory.
    pub fn checkpoint_dir(&self) -> Result<PathBuf> {
        match &self.checkpoint_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join("checkpoints")),
        }
    }
}

/// The taskdeck home directory: `$TASKDECK_HOME` if set, else `~/.taskdeck`.
pub fn home_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TASKDECK_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(Path::new(&home).join(".taskdeck"))
}
