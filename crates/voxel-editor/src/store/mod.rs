//! Screens and their append-only version history.
//!
//! The persistence backend is an external collaborator; [`ScreenStore`] is
//! its interface. [`MemoryStore`] keeps everything in memory and
//! [`JsonFileStore`] writes one JSON file per screen.

mod file;
mod memory;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// An immutable snapshot of a document plus provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Position in the screen's history, starting at 1.
    pub number: u32,
    /// The document markup.
    pub html: String,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Instruction that produced this version, if it came from generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional provenance attached when saving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMeta {
    /// Originating instruction.
    pub prompt: Option<String>,
    /// Human description.
    pub description: Option<String>,
}

impl VersionMeta {
    /// Meta carrying only a description.
    #[must_use]
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            prompt: None,
            description: Some(description.into()),
        }
    }
}

/// A screen's active content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedScreen {
    /// Screen id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Markup of the latest version.
    pub html: String,
}

/// One line of a screen listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenSummary {
    /// Screen id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of versions.
    pub version_count: usize,
    /// Creation time of the latest version.
    pub updated_at_ms: u64,
}

/// Load/save/list/delete over screens and versions.
pub trait ScreenStore {
    /// Create a screen whose first version is `html`. Returns its id.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backend cannot write.
    fn create_screen(&mut self, name: &str, html: &str) -> Result<String, StoreError>;

    /// The latest version of a screen.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no such screen exists.
    fn load_screen(&self, id: &str) -> Result<LoadedScreen, StoreError>;

    /// All screens.
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backend cannot be read.
    fn list_screens(&self) -> Result<Vec<ScreenSummary>, StoreError>;

    /// Remove a screen and its history.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no such screen exists.
    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError>;

    /// Append a version. Existing versions are never touched.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown screen, or a backend error.
    fn save_version(&mut self, id: &str, html: &str, meta: VersionMeta) -> Result<Version, StoreError>;

    /// Every version of a screen, oldest first.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no such screen exists.
    fn list_versions(&self, id: &str) -> Result<Vec<Version>, StoreError>;
}

/// The persisted shape of one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ScreenRecord {
    pub id: String,
    pub name: String,
    pub versions: Vec<Version>,
}

impl ScreenRecord {
    pub fn new(id: String, name: &str, html: &str) -> Self {
        let mut record = Self {
            id,
            name: name.to_string(),
            versions: Vec::new(),
        };
        let _ = record.append(html, VersionMeta::described("Initial import"));
        record
    }

    /// Append a version stamped no earlier than the previous one.
    pub fn append(&mut self, html: &str, meta: VersionMeta) -> Version {
        let previous = self.versions.last();
        let created_at_ms = previous.map_or(0, |v| v.created_at_ms).max(now_ms());
        #[allow(clippy::cast_possible_truncation)]
        let number = self.versions.len() as u32 + 1;
        let version = Version {
            number,
            html: html.to_string(),
            created_at_ms,
            prompt: meta.prompt,
            description: meta.description,
        };
        self.versions.push(version.clone());
        version
    }

    pub fn loaded(&self) -> LoadedScreen {
        LoadedScreen {
            id: self.id.clone(),
            name: self.name.clone(),
            html: self.versions.last().map(|v| v.html.clone()).unwrap_or_default(),
        }
    }

    pub fn summary(&self) -> ScreenSummary {
        ScreenSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            version_count: self.versions.len(),
            updated_at_ms: self.versions.last().map_or(0, |v| v.created_at_ms),
        }
    }
}

/// Lowercase ASCII slug of a display name, for readable ids.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "screen".to_string()
    } else {
        slug.to_string()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
