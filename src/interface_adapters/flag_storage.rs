// Client-side storage adapters for the persisted login hint.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::FlagStorage;

/// JSON-object file holding string keys and values.
///
/// A missing file reads as empty. Writes replace the whole file.
#[derive(Debug)]
pub struct FileFlagStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileFlagStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, String> {
        match self.read_raw()? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| format!("corrupt flag file {}: {err}", self.path.display())),
            None => Ok(BTreeMap::new()),
        }
    }

    // I/O failures propagate; only unparseable content is replaced.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, String> {
        let Some(raw) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "discarding corrupt flag file");
                Ok(BTreeMap::new())
            }
        }
    }

    // `None` for a missing or blank file.
    fn read_raw(&self) -> Result<Option<String>, String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("read {}: {err}", self.path.display())),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| format!("create {}: {err}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|err| err.to_string())?;
        fs::write(&self.path, raw).map_err(|err| format!("write {}: {err}", self.path.display()))
    }
}

impl FlagStorage for FileFlagStorage {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_update()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(format!("remove {}: {err}", self.path.display())),
            };
        }
        self.store(&entries)
    }
}

/// Process-local storage; the hint is lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryFlagStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl FlagStorage for InMemoryFlagStorage {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
