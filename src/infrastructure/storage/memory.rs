use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::errors::StorageError;
use crate::domain::storage::KeyValueStore;

#[derive(Default)]
struct MemoryState {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryState {
    fn usage(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

/// In-memory [`KeyValueStore`].
///
/// Clones share the same map, which is how tests model several tabs looking at
/// one origin's `localStorage`. An optional byte quota reproduces the host's
/// "quota exceeded" failure.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        store.state.borrow_mut().quota = Some(bytes);
        store
    }

    pub fn usage(&self) -> usize {
        self.state.borrow().usage()
    }

    /// Raw access for tests that plant foreign or hand-written entries.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.borrow().items.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.state.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        if let Some(quota) = state.quota {
            let replaced = state.items.get(key).map_or(0, |old| key.len() + old.len());
            let projected = state.usage() - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_string() });
            }
        }
        state.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.state.borrow_mut().items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.state.borrow_mut().items.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.state.borrow().items.keys().cloned().collect())
    }
}
