use std::fs;
use std::path::{Path, PathBuf};

use super::{LoadedScreen, ScreenRecord, ScreenStore, ScreenSummary, Version, VersionMeta, slugify};
use crate::error::StoreError;

/// Store writing `<id>.json` per screen under a directory.
///
/// Writes go to a temporary file that is then renamed over the record, so a
/// crash mid-write never leaves a truncated screen behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the records.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        // Ids are slugs; anything else cannot name a record.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    fn read(&self, id: &str) -> Result<ScreenRecord, StoreError> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn write(&self, record: &ScreenRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl ScreenStore for JsonFileStore {
    fn create_screen(&mut self, name: &str, html: &str) -> Result<String, StoreError> {
        let base = slugify(name);
        let mut id = base.clone();
        let mut n = 2;
        while self.path_for(&id)?.exists() {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.write(&ScreenRecord::new(id.clone(), name, html))?;
        tracing::info!(id, "created screen");
        Ok(id)
    }

    fn load_screen(&self, id: &str) -> Result<LoadedScreen, StoreError> {
        Ok(self.read(id)?.loaded())
    }

    fn list_screens(&self) -> Result<Vec<ScreenSummary>, StoreError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            summaries.push(self.read(id)?.summary());
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_version(&mut self, id: &str, html: &str, meta: VersionMeta) -> Result<Version, StoreError> {
        let mut record = self.read(id)?;
        let version = record.append(html, meta);
        self.write(&record)?;
        tracing::info!(id, version = version.number, "saved version");
        Ok(version)
    }

    fn list_versions(&self, id: &str) -> Result<Vec<Version>, StoreError> {
        Ok(self.read(id)?.versions)
    }
}
