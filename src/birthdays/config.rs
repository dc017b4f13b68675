//! User options for the birthday overlay and where they are read from.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

pub const CYCLE_DURATION_RANGE: RangeInclusive<u32> = 1..=600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown cycle type {0:?}; accepted values are Always, Hover and Click")]
    UnknownCycleType(String),
}

/// User options for the birthday overlay, read from `config.json`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BirthdayConfig {
    /// Frames between two portrait swaps.
    pub cycle_duration: u32,
    /// `Always`, `Hover` or `Click`. Kept as text so unknown values can be reported.
    pub cycle_type: String,
    pub show_icon: bool,
}

impl Default for BirthdayConfig {
    fn default() -> Self {
        Self {
            cycle_duration: 120,
            cycle_type: "Always".to_string(),
            show_icon: true,
        }
    }
}

impl BirthdayConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BirthdayConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamps the cycle duration into [`CYCLE_DURATION_RANGE`].
    pub fn sanitized(mut self) -> Self {
        let clamped = self
            .cycle_duration
            .clamp(*CYCLE_DURATION_RANGE.start(), *CYCLE_DURATION_RANGE.end());
        if clamped != self.cycle_duration {
            warn!(
                "[Birthdays] cycleDuration {} is outside {}-{}, using {}",
                self.cycle_duration,
                CYCLE_DURATION_RANGE.start(),
                CYCLE_DURATION_RANGE.end(),
                clamped
            );
            self.cycle_duration = clamped;
        }
        self
    }

    /// Reads the config file. `Ok(None)` when it does not exist.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json).map(Some)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn config_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("config.json")
}

/// Startup: read the config file, falling back to defaults on any problem.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_birthday_config(mut commands: Commands) {
    let path = config_path();
    let config = match BirthdayConfig::load(&path) {
        Ok(Some(config)) => {
            info!("[Birthdays] Loaded config from {}", path.display());
            config
        }
        Ok(None) => {
            info!("[Birthdays] No config at {}, using defaults", path.display());
            BirthdayConfig::default()
        }
        Err(e) => {
            warn!("[Birthdays] {} ({}); using defaults", e, path.display());
            BirthdayConfig::default()
        }
    };
    commands.insert_resource(config);
}

#[cfg(target_arch = "wasm32")]
pub fn load_birthday_config(mut commands: Commands) {
    commands.insert_resource(BirthdayConfig::default());
}
