//! Snapshot persistence.
//!
//! A counter persists only its current value, wrapped in a versioned
//! [`Snapshot`]. Bounds, step, and the initial value come from the
//! [`CounterConfig`] used to rehydrate it, so a changed config still wins
//! over stale stored data.
//!
//! ```
//! use counter_kit::persist::MemoryStore;
//! use counter_kit::{BoundedCounter, CounterConfig};
//!
//! let config = CounterConfig::default().with_bounds(0, 10);
//! let mut store = MemoryStore::new();
//!
//! let counter = BoundedCounter::new(config.clone()).unwrap();
//! counter.set(7);
//! counter.save(&mut store, "clicks").unwrap();
//!
//! let restored = BoundedCounter::rehydrate(config, &store, "clicks").unwrap();
//! assert_eq!(restored.value(), 7);
//! assert_eq!(restored.initial(), 0);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::warn;

use crate::observer::{CounterEvent, SubscriptionId};
use crate::{BoundedCounter, ConfigurationError, CounterConfig, PersistError};

/// The persisted form of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Encoding version, see [`Snapshot::CURRENT_VERSION`].
    pub version: u8,
    /// Counter value at the time of saving.
    pub value: i64,
}

impl Snapshot {
    /// Version written by this crate.
    pub const CURRENT_VERSION: u8 = 1;

    /// Snapshot of `value` at the current version.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            value,
        }
    }

    /// Encode as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, PersistError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from JSON, rejecting versions this crate cannot read.
    pub fn decode(bytes: &[u8]) -> Result<Self, PersistError> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        if snapshot.version != Self::CURRENT_VERSION {
            return Err(PersistError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Key-value storage for encoded snapshots.
///
/// Values are opaque bytes; the store does not interpret them.
pub trait StateStore {
    /// Error type for this backend.
    type Error: fmt::Display;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Retrieve the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), Self::Error>;

    /// Whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory storage backend. Nothing touches disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.entries.contains_key(key))
    }
}

/// Filesystem backend: one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid store key {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StateStore for FileStore {
    type Error = io::Error;

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl BoundedCounter {
    /// Current value as a [`Snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.value())
    }

    /// Write the current snapshot under `key`.
    pub fn save<S: StateStore>(&self, store: &mut S, key: &str) -> Result<(), PersistError> {
        let bytes = self.snapshot().encode()?;
        store
            .put(key, &bytes)
            .map_err(|e| PersistError::Store(e.to_string()))
    }

    /// Build a counter from `config` and the snapshot stored under `key`.
    ///
    /// Configuration errors are returned as usual. Everything else falls
    /// back: a missing key, an unreadable store, or an undecodable snapshot
    /// start the counter at `initial`, and a stored value outside the
    /// configured bounds is clamped.
    pub fn rehydrate<S: StateStore>(
        config: CounterConfig,
        store: &S,
        key: &str,
    ) -> Result<Self, ConfigurationError> {
        let bounds = config.validate()?;
        let value = match load_snapshot(store, key) {
            Ok(Some(snapshot)) => {
                let clamped = bounds.clamp(snapshot.value);
                if clamped != snapshot.value {
                    warn!(
                        key,
                        stored = snapshot.value,
                        clamped,
                        %bounds,
                        "stored counter value outside bounds; clamping"
                    );
                }
                clamped
            }
            Ok(None) => config.initial,
            Err(e) => {
                warn!(key, error = %e, "could not restore counter; starting from initial value");
                config.initial
            }
        };
        Ok(Self::from_parts(&config, bounds, value))
    }

    /// Save a snapshot under `key` after every value change.
    ///
    /// Save failures are logged and otherwise ignored. Unsubscribe with the
    /// returned id to stop persisting.
    pub fn persist_on_change<S>(&self, store: Rc<RefCell<S>>, key: impl Into<String>) -> SubscriptionId
    where
        S: StateStore + 'static,
    {
        let key = key.into();
        self.subscribe(move |event| {
            let CounterEvent::ValueChanged { current, .. } = *event else {
                return;
            };
            let result = Snapshot::new(current).encode().and_then(|bytes| {
                store
                    .borrow_mut()
                    .put(&key, &bytes)
                    .map_err(|e| PersistError::Store(e.to_string()))
            });
            if let Err(e) = result {
                warn!(key = %key, error = %e, "failed to persist counter snapshot");
            }
        })
    }
}

fn load_snapshot<S: StateStore>(store: &S, key: &str) -> Result<Option<Snapshot>, PersistError> {
    let Some(bytes) = store
        .get(key)
        .map_err(|e| PersistError::Store(e.to_string()))?
    else {
        return Ok(None);
    };
    Snapshot::decode(&bytes).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_json_shape() {
        let bytes = Snapshot::new(-3).encode().unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&bytes).unwrap(),
            serde_json::json!({ "version": 1, "value": -3 })
        );
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let err = Snapshot::decode(br#"{"version": 9, "value": 1}"#).unwrap_err();
        assert!(matches!(err, PersistError::UnsupportedVersion(9)));
    }

    #[test]
    fn memory_store_basic_ops() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.put("a", b"1").unwrap();
        assert!(store.exists("a").unwrap());
        assert_eq!(store.get("a").unwrap().as_deref(), Some(b"1".as_slice()));
        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn rehydrate_missing_key_starts_at_initial() {
        let store = MemoryStore::new();
        let c = BoundedCounter::rehydrate(CounterConfig::default().with_initial(3), &store, "x")
            .unwrap();
        assert_eq!(c.value(), 3);
        assert_eq!(c.history(), vec![3]);
    }

    #[test]
    fn rehydrate_clamps_out_of_bounds_value() {
        let mut store = MemoryStore::new();
        store.put("x", &Snapshot::new(500).encode().unwrap()).unwrap();
        let c = BoundedCounter::rehydrate(CounterConfig::default().with_bounds(0, 10), &store, "x")
            .unwrap();
        assert_eq!(c.value(), 10);
        assert_eq!(c.history(), vec![0, 10]);
    }

    #[test]
    fn rehydrate_falls_back_on_garbage() {
        let mut store = MemoryStore::new();
        store.put("x", b"not json").unwrap();
        let c = BoundedCounter::rehydrate(CounterConfig::default().with_initial(2), &store, "x")
            .unwrap();
        assert_eq!(c.value(), 2);
    }

    #[test]
    fn rehydrate_still_rejects_bad_config() {
        let store = MemoryStore::new();
        let err = BoundedCounter::rehydrate(CounterConfig::default().with_step(0), &store, "x")
            .unwrap_err();
        assert_eq!(err, ConfigurationError::NonPositiveStep(0));
    }

    #[test]
    fn persist_on_change_writes_every_change() {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        let c = BoundedCounter::default();
        c.persist_on_change(Rc::clone(&store), "clicks");

        c.increment();
        c.increment();
        let saved = store.borrow().get("clicks").unwrap().unwrap();
        assert_eq!(Snapshot::decode(&saved).unwrap().value, 2);

        c.reset();
        let saved = store.borrow().get("clicks").unwrap().unwrap();
        assert_eq!(Snapshot::decode(&saved).unwrap().value, 0);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        for key in ["", "../up", "a/b", ".hidden"] {
            assert!(store.put(key, b"{}").is_err(), "key {key:?} accepted");
        }
    }
}
