use std::collections::BTreeMap;

use super::{LoadedScreen, ScreenRecord, ScreenStore, ScreenSummary, Version, VersionMeta, slugify};
use crate::error::StoreError;

/// Store that lives and dies with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    screens: BTreeMap<String, ScreenRecord>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: &str) -> Result<&ScreenRecord, StoreError> {
        self.screens
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl ScreenStore for MemoryStore {
    fn create_screen(&mut self, name: &str, html: &str) -> Result<String, StoreError> {
        let base = slugify(name);
        let mut id = base.clone();
        let mut n = 2;
        while self.screens.contains_key(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        let _ = self
            .screens
            .insert(id.clone(), ScreenRecord::new(id.clone(), name, html));
        Ok(id)
    }

    fn load_screen(&self, id: &str) -> Result<LoadedScreen, StoreError> {
        self.record(id).map(ScreenRecord::loaded)
    }

    fn list_screens(&self) -> Result<Vec<ScreenSummary>, StoreError> {
        Ok(self.screens.values().map(ScreenRecord::summary).collect())
    }

    fn delete_screen(&mut self, id: &str) -> Result<(), StoreError> {
        self.screens
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save_version(&mut self, id: &str, html: &str, meta: VersionMeta) -> Result<Version, StoreError> {
        let record = self
            .screens
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(record.append(html, meta))
    }

    fn list_versions(&self, id: &str) -> Result<Vec<Version>, StoreError> {
        Ok(self.record(id)?.versions.clone())
    }
}
