//! User preferences.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Ask before quitting with unsaved changes.
    pub show_save_prompt: bool,
    pub ui_scale: f32,
    /// Extra pixel width added to every line, `-1.0..=1.0`.
    pub ui_line_width: f32,
    pub double_click_time_ms: u64,
    pub app_name: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_save_prompt: true,
            ui_scale: 1.0,
            ui_line_width: 0.0,
            double_click_time_ms: 350,
            app_name: "Aurora".to_owned(),
        }
    }
}

impl Preferences {
    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let text = fs::read_to_string(path).map_err(|source| PrefsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| PrefsError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| PrefsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, writing defaults there first when it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, PrefsError> {
        if !path.exists() {
            tracing::info!("Creating default preferences at {}", path.display());
            let prefs = Self::default();
            prefs.save(path)?;
            return Ok(prefs);
        }
        Self::load(path)
    }
}
