use std::{
    collections::{BTreeMap, HashMap},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::Result;

/// Persistent integer settings, addressed by key.
pub trait KeyValueStore {
    /// Returns the stored integer, or 0 when the key is absent.
    fn get_int(&self, key: &str) -> i64;
    fn set_int(&mut self, key: &str, value: i64) -> Result<()>;
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object on disk. The whole file is replaced
/// atomically on every `set_int`; entries that are not integers are
/// preserved untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store. A missing file, or one that does not hold a JSON
    /// object, starts the store empty; the damaged file is replaced on the
    /// next `set_int`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&raw) {
                    Ok(values) => values,
                    Err(err) => {
                        tracing::warn!(
                            ?path,
                            %err,
                            "settings file is unreadable, starting empty"
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(?path, entries = values.len(), "opened settings store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.values)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Written beside the target and renamed over it, so a crash mid-save
        // leaves the previous file intact.
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(raw.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_int(&self, key: &str) -> i64 {
        self.values.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush()
    }
}

/// The one tempo the user has stashed, 0 meaning nothing was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTempo {
    key: String,
    bpm: u32,
}

impl SavedTempo {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            bpm: 0,
        }
    }

    /// Reads the persisted value into memory. Absent or negative values load
    /// as 0.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> u32 {
        self.bpm = u32::try_from(store.get_int(&self.key)).unwrap_or(0);
        self.bpm
    }

    pub fn save(&mut self, store: &mut dyn KeyValueStore, bpm: u32) -> Result<()> {
        store.set_int(&self.key, i64::from(bpm))?;
        self.bpm = bpm;
        tracing::info!(bpm, key = %self.key, "saved tempo");
        Ok(())
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn is_set(&self) -> bool {
        self.bpm != 0
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int("missing"), 0);
        store.set_int("bpm", 96).unwrap();
        assert_eq!(store.get_int("bpm"), 96);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("bmp_saved_key"), 0);
        store.set_int("bmp_saved_key", 120).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("bmp_saved_key"), 120);
    }

    #[test]
    fn file_store_keeps_foreign_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("theme"), 0);
        store.set_int("bpm", 70).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("dark"));
        assert!(raw.contains("70"));
    }

    #[test]
    fn damaged_file_opens_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        for damaged in [r#"{"bmp_saved_key": 1"#, "[]", "not json"] {
            std::fs::write(&path, damaged).unwrap();
            let store = JsonFileStore::open(&path).unwrap();
            assert_eq!(store.get_int("bmp_saved_key"), 0);
        }

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("bmp_saved_key", 132).unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("bmp_saved_key"), 132);
    }

    #[test]
    fn save_leaves_no_staging_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("bmp_saved_key", 90).unwrap();
        store.set_int("bmp_saved_key", 91).unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn saved_tempo_round_trips_through_store() {
        let mut store = MemoryStore::new();
        let mut saved = SavedTempo::new("bmp_saved_key");
        assert_eq!(saved.load(&store), 0);
        assert!(!saved.is_set());

        saved.save(&mut store, 120).unwrap();
        assert_eq!(store.get_int("bmp_saved_key"), 120);

        let mut relaunched = SavedTempo::new("bmp_saved_key");
        assert_eq!(relaunched.load(&store), 120);
        assert!(relaunched.is_set());
    }

    #[test]
    fn negative_persisted_value_loads_as_unset() {
        let mut store = MemoryStore::new();
        store.set_int("bmp_saved_key", -4).unwrap();

        let mut saved = SavedTempo::new("bmp_saved_key");
        assert_eq!(saved.load(&store), 0);
    }
}
