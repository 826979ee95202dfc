//! Preference storage back-ends
//!
//! A key/value string store in the shape of web `localStorage`. The
//! preference store writes one JSON blob under one key.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Result;

/// Key/value storage for persisted preferences
pub trait PreferenceStorage {
    /// Read a value
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, one map per origin
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    origin: String,
    items: HashMap<String, HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::for_origin("null")
    }

    /// Storage scoped to an origin
    pub fn for_origin(origin: &str) -> Self {
        Self { origin: origin.to_string(), items: HashMap::new() }
    }

    /// Storage pre-seeded with a single item
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.items.entry(storage.origin.clone()).or_default().insert(key.to_string(), value.to_string());
        storage
    }

    /// Switch the active origin
    pub fn set_origin(&mut self, origin: &str) {
        self.origin = origin.to_string();
    }

    /// Number of items for the active origin
    pub fn len(&self) -> usize {
        self.items.get(&self.origin).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(&self.origin).and_then(|m| m.get(key)).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.entry(self.origin.clone()).or_default().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if let Some(map) = self.items.get_mut(&self.origin) {
            map.remove(key);
        }
        Ok(())
    }
}

/// File-backed storage: one JSON object of string values per file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, items: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut tmp_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::debug!("Wrote {} storage items to {}", items.len(), self.path.display());
        Ok(())
    }
}

impl PreferenceStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every write
        let mut items = self.load().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable storage file {}: {}", self.path.display(), e);
            HashMap::new()
        });
        items.insert(key.to_string(), value.to_string());
        self.store(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.store(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_origins() {
        let mut storage = MemoryStorage::for_origin("https://lodge.example");
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.set_origin("https://other.example");
        assert_eq!(storage.get_item("k").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_remove() {
        let mut storage = MemoryStorage::with_item("k", "v");
        assert_eq!(storage.len(), 1);
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut storage = FileStorage::new(&path);
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "{\"version\":1}").unwrap();
        storage.set_item("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("{\"version\":1}"));
        assert!(!path.with_file_name("prefs.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let mut storage = FileStorage::new(&path);
        assert!(storage.get_item("k").is_err());
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
