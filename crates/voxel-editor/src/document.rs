//! The canonical HTML string of one screen.

use std::path::Path;

use voxel_common::net::{fetch_text, is_remote};
use voxel_common::notice::Notice;
use voxel_html::serializer::escape_text;

use crate::error::LoadError;

/// The authoritative markup for one screen at a point in time.
///
/// A `Document` is never patched in place. Every commit replaces it
/// wholesale, so readers always see a complete string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Full HTML text, head and body.
    pub raw: String,
    /// Screen the document belongs to, if it came from a store.
    pub screen_id: Option<String>,
}

impl Document {
    /// Accept arbitrary markup verbatim. Nothing is validated or rejected.
    #[must_use]
    pub fn load(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            screen_id: None,
        }
    }

    /// Bind the document to a stored screen.
    #[must_use]
    pub fn with_screen_id(mut self, screen_id: impl Into<String>) -> Self {
        self.screen_id = Some(screen_id.into());
        self
    }

    /// Minimal renderable document naming the screen.
    #[must_use]
    pub fn placeholder(display_name: &str) -> Self {
        let mut name = String::new();
        escape_text(display_name, &mut name);
        Self::load(format!(
            "<!DOCTYPE html><html><head><title>{name}</title></head>\
             <body><h1>{name}</h1><p>The source for this screen could not be loaded.</p></body></html>"
        ))
    }
}

/// Read screen markup from a local path or an `http(s)` URL.
///
/// # Errors
/// Returns [`LoadError`] if the file cannot be read or the fetch fails.
pub fn read_source(source: &str) -> Result<String, LoadError> {
    if is_remote(source) {
        fetch_text(source).map_err(|e| LoadError::Fetch {
            url: source.to_string(),
            source: e,
        })
    } else {
        std::fs::read_to_string(Path::new(source)).map_err(|e| LoadError::Io {
            path: source.to_string(),
            source: e,
        })
    }
}

/// Load a screen's markup, falling back to a placeholder on failure.
///
/// The editor always ends up with something renderable; an unreachable
/// source is reported through the returned notice instead of an error.
#[must_use]
pub fn load_screen_source(source: &str, display_name: &str) -> (Document, Option<Notice>) {
    match read_source(source) {
        Ok(raw) => {
            tracing::info!(source, bytes = raw.len(), "loaded screen source");
            (Document::load(raw), None)
        }
        Err(e) => {
            let notice = Notice::warning("Loader", format!("{e}; showing a placeholder"));
            (Document::placeholder(display_name), Some(notice))
        }
    }
}
