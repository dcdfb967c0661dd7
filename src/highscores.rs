//! Persisted best score
//!
//! A single integer under a fixed storage key, read once at startup and
//! written through every time it improves. Storage failures never reach the
//! game: the best score keeps living in memory for the rest of the session.

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Best score ever reached, backed by a durable store
pub struct HighScore {
    best: u64,
    key: String,
    store: Box<dyn KeyValueStore>,
    /// False once storage has failed; no further writes are attempted
    durable: bool,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore")
            .field("best", &self.best)
            .field("key", &self.key)
            .field("durable", &self.durable)
            .finish()
    }
}

impl HighScore {
    /// Load the stored best score (0 when absent or unreadable)
    pub fn load(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (best, durable) = match read_best(store.as_ref(), &key) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                (best, true)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                (0, true)
            }
            Err(StorageError::Corrupt { key, source }) => {
                // Storage works, only the value is bad; it gets overwritten on the next record
                log::warn!("Discarding corrupt high score under `{}`: {}", key, source);
                (0, true)
            }
            Err(e) => {
                log::warn!("High score storage unavailable, keeping it in memory: {}", e);
                (0, false)
            }
        };

        Self {
            best,
            key,
            store,
            durable,
        }
    }

    /// In-memory only (nothing is ever persisted)
    pub fn in_memory() -> Self {
        Self {
            best: 0,
            key: String::new(),
            store: Box::new(crate::persistence::MemoryStore::new()),
            durable: false,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether new records still reach durable storage
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Offer a score; returns true if it set a new record
    ///
    /// A new record is written through immediately.
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;

        if self.durable {
            let value = self.best.to_string();
            if let Err(e) = self.store.set_item(&self.key, &value) {
                log::warn!("Failed to save high score, keeping it in memory: {}", e);
                self.durable = false;
            }
        }
        true
    }
}

fn read_best(store: &dyn KeyValueStore, key: &str) -> Result<Option<u64>, StorageError> {
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str::<u64>(raw.trim())
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::persistence::{BrokenStore, MemoryStore};

    const KEY: &str = "flappyHighScore";

    /// Store handle that stays inspectable after being boxed into `HighScore`
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set_item(key, value)
        }
    }

    #[test]
    fn test_load_defaults_to_zero() {
        let hs = HighScore::load(Box::new(MemoryStore::new()), KEY);
        assert_eq!(hs.best(), 0);
        assert!(hs.is_durable());
    }

    #[test]
    fn test_load_existing_value() {
        let mut store = MemoryStore::new();
        store.set_item(KEY, "42").unwrap();
        let hs = HighScore::load(Box::new(store), KEY);
        assert_eq!(hs.best(), 42);
    }

    #[test]
    fn test_record_is_monotonic_and_written_through() {
        let shared = SharedStore::default();
        let mut hs = HighScore::load(Box::new(shared.clone()), KEY);

        assert!(hs.record(3));
        assert_eq!(shared.get_item(KEY).unwrap().as_deref(), Some("3"));

        assert!(!hs.record(2));
        assert!(!hs.record(3));
        assert_eq!(hs.best(), 3);
        assert_eq!(shared.get_item(KEY).unwrap().as_deref(), Some("3"));

        assert!(hs.record(10));
        assert_eq!(shared.get_item(KEY).unwrap().as_deref(), Some("10"));
    }

    #[test]
    fn test_corrupt_value_is_replaced() {
        let shared = SharedStore::default();
        shared.0.borrow_mut().set_item(KEY, "lots").unwrap();

        let mut hs = HighScore::load(Box::new(shared.clone()), KEY);
        assert_eq!(hs.best(), 0);
        assert!(hs.is_durable());

        hs.record(1);
        assert_eq!(shared.get_item(KEY).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_broken_storage_degrades_to_memory() {
        let mut hs = HighScore::load(Box::new(BrokenStore), KEY);
        assert_eq!(hs.best(), 0);
        assert!(!hs.is_durable());

        assert!(hs.record(5));
        assert_eq!(hs.best(), 5);
    }

    #[test]
    fn test_write_failure_degrades_to_memory() {
        struct ReadOnly;
        impl KeyValueStore for ReadOnly {
            fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(Some("4".to_string()))
            }
            fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::Unavailable("quota exceeded".to_string()))
            }
        }

        let mut hs = HighScore::load(Box::new(ReadOnly), KEY);
        assert_eq!(hs.best(), 4);
        assert!(hs.is_durable());

        assert!(hs.record(9));
        assert_eq!(hs.best(), 9);
        assert!(!hs.is_durable());
    }
}
