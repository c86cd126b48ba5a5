//! Session settings
//!
//! Persisted as JSON next to the high score table. Missing fields fall back
//! to their defaults so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{RESET_HOLD_MS, RESTART_AFTER_DEATH_MS};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level loaded when a session starts
    pub start_level: String,
    /// Seed for monster jitter; the same seed replays the same level
    pub seed: u64,
    /// Where the high score table is stored
    pub highscore_path: PathBuf,

    // === Timing ===
    /// Time after death before the level restarts (exclusive)
    pub restart_delay_ms: f64,
    /// How long the reset combination must be held
    pub reset_hold_ms: f64,

    /// Verbose simulation logging
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: "Map2".to_string(),
            seed: 0x5EED,
            highscore_path: PathBuf::from("highscores.json"),
            restart_delay_ms: RESTART_AFTER_DEATH_MS,
            reset_hold_ms: RESET_HOLD_MS,
            debug: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| Error::Json {
            context: path.display().to_string(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::info!("Using default settings ({err})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            context: "settings".to_string(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
