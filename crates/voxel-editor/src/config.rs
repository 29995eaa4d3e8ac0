//! Editor configuration.
//!
//! Values come from built-in defaults, optionally a JSON file, then
//! `VOXEL_*` environment variables. Every field has a default, so a config
//! file only needs the keys it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables and reserved names used by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiescence required before a burst of keystrokes is committed.
    pub debounce_ms: u64,
    /// Width of the floating toolbar, used to clamp it inside the viewport.
    pub toolbar_width: f32,
    /// How far above the interaction point the toolbar is drawn.
    pub toolbar_vertical_offset: f32,
    /// The toolbar never renders above this offset from the top edge.
    pub toolbar_min_top: f32,
    /// Reserved id of the injected style block.
    pub style_id: String,
    /// Marker attribute carried by the selected element.
    pub selection_attribute: String,
    /// Marker attribute carried by the hovered element.
    pub hover_attribute: String,
    /// Visible marker placed on containers the editor inserted.
    pub inserted_attribute: String,
    /// Separator between segments of the selection path.
    pub path_separator: String,
    /// Whether component-library fragments get the inserted-marker wrapper
    /// that generated fragments always get.
    pub wrap_library_fragments: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 800,
            toolbar_width: 200.0,
            toolbar_vertical_offset: 50.0,
            toolbar_min_top: 10.0,
            style_id: "voxel-editor-styles".to_string(),
            selection_attribute: "data-voxel-selected".to_string(),
            hover_attribute: "data-voxel-hover".to_string(),
            inserted_attribute: "data-voxel-inserted".to_string(),
            path_separator: " > ".to_string(),
            wrap_library_fragments: true,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config document. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the JSON does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Defaults with environment overrides applied.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// Reads the following environment variables:
    /// - `VOXEL_DEBOUNCE_MS`: debounce window in milliseconds
    /// - `VOXEL_TOOLBAR_WIDTH`: toolbar width in pixels
    /// - `VOXEL_STYLE_ID`: reserved id of the injected style block
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] if a numeric variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] if a numeric variable does not parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("VOXEL_DEBOUNCE_MS") {
            self.debounce_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "VOXEL_DEBOUNCE_MS",
                value,
            })?;
        }
        if let Some(value) = lookup("VOXEL_TOOLBAR_WIDTH") {
            self.toolbar_width = value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|w| w.is_finite() && *w >= 0.0)
                .ok_or(ConfigError::InvalidEnv {
                    var: "VOXEL_TOOLBAR_WIDTH",
                    value,
                })?;
        }
        if let Some(value) = lookup("VOXEL_STYLE_ID")
            && !value.trim().is_empty()
        {
            self.style_id = value.trim().to_string();
        }
        Ok(())
    }

    /// The debounce window as a `Duration`.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
