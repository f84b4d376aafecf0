use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use crate::domain::errors::StorageError;
use crate::domain::storage::{KeyValueStore, StorageArea};

/// [`KeyValueStore`] over the browser's `localStorage` / `sessionStorage`.
#[derive(Clone)]
pub struct WebStorage {
    area: StorageArea,
    storage: Storage,
}

impl WebStorage {
    pub fn local() -> Result<Self, StorageError> {
        Self::open(StorageArea::Persistent)
    }

    pub fn session() -> Result<Self, StorageError> {
        Self::open(StorageArea::Session)
    }

    pub fn open(area: StorageArea) -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("Window not available".to_string()))?;
        let storage = match area {
            StorageArea::Persistent => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        }
        .map_err(|e| StorageError::Unavailable(describe(&e)))?
        .ok_or_else(|| StorageError::Unavailable(format!("{area} storage disabled")))?;
        Ok(Self { area, storage })
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }

    pub fn raw(&self) -> &Storage {
        &self.storage
    }
}

fn describe(value: &JsValue) -> String {
    match value.dyn_ref::<DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => format!("{value:?}"),
    }
}

/// Browsers disagree on how they report a full store.
fn is_quota_error(value: &JsValue) -> bool {
    value.dyn_ref::<DomException>().is_some_and(|exception| {
        let name = exception.name();
        name == "QuotaExceededError"
            || name == "NS_ERROR_DOM_QUOTA_REACHED"
            || exception.code() == 22
            || exception.code() == 1014
    })
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| {
            if is_quota_error(&e) {
                StorageError::QuotaExceeded { key: key.to_string() }
            } else {
                StorageError::Unavailable(describe(&e))
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .clear()
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self.len()?;
        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(key) = self
                .storage
                .key(index as u32)
                .map_err(|e| StorageError::Unavailable(describe(&e)))?
            {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.storage
            .length()
            .map(|len| len as usize)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }
}
