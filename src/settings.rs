//! Demo settings
//!
//! Read from an optional JSON file. Missing fields fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::arena::DEFAULT_BACKGROUND;
use crate::error::SettingsError;
use crate::surface::Color;

/// Settings for a demo session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena (and frame) width in pixels
    pub width: u32,
    /// Arena (and frame) height in pixels
    pub height: u32,
    /// Display refresh rate; the engine runs at whatever pace this allows
    pub refresh_hz: u32,
    /// Released frame buffers kept for reuse
    pub frame_pool: usize,
    pub background: Color,

    // === Session ===
    /// Number of start/stop runs, like a surface being created and destroyed
    pub cycles: u32,
    /// Time each run is left going
    pub run_millis: u64,
    /// Pause between runs
    pub pause_millis: u64,
    /// Write the last presented frame here as a PPM image
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            refresh_hz: 60,
            frame_pool: 3,
            background: DEFAULT_BACKGROUND,

            cycles: 2,
            run_millis: 2_000,
            pause_millis: 250,
            snapshot_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;

        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "arena must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.refresh_hz == 0 {
            return Err(SettingsError::Invalid("refresh_hz must be positive".into()));
        }
        Ok(())
    }
}
