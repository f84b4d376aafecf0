use js_sys::Array;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::application::StorageAccessor;
use crate::config::StorageConfig;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::storage::{StorageArea, Ttl};
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};
use crate::infrastructure::storage::WebStorage;

/// WASM API for JavaScript callers that share the dashboard's stores.
/// Values cross the boundary as JSON text.
#[wasm_bindgen]
pub struct StorageApi {
    accessor: StorageAccessor,
}

#[wasm_bindgen]
impl StorageApi {
    /// `area` is `"local"` or `"session"`.
    #[wasm_bindgen(constructor)]
    pub fn new(area: &str) -> Result<StorageApi, JsValue> {
        let area: StorageArea = area
            .parse()
            .map_err(|_| JsValue::from_str(&format!("Unknown storage area: {area}")))?;
        let store = WebStorage::open(area).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let config = StorageConfig::production();
        let diagnostics = Diagnostics::init(&config, Arc::new(BrowserTimeProvider::new()))
            .with_sink(Box::new(ConsoleLogger::new_production()));
        Ok(Self {
            accessor: StorageAccessor::new(area, Rc::new(store), &config, diagnostics),
        })
    }

    /// JSON text of the stored value, or `undefined` when absent or expired.
    #[wasm_bindgen(js_name = getItem)]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.accessor
            .get::<serde_json::Value>(key)
            .map(|value| value.to_string())
    }

    /// Rejects text that is not JSON; storage failures are logged, not thrown.
    #[wasm_bindgen(js_name = setItem)]
    pub fn set_item(&self, key: &str, json: &str, ttl_seconds: Option<u32>) -> Result<(), JsValue> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid JSON: {e}")))?;
        self.accessor
            .set(key, &value, ttl_seconds.map(|secs| Ttl::secs(secs.into())));
        Ok(())
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, key: &str) {
        self.accessor.remove(key);
    }

    #[wasm_bindgen(js_name = purgeExpired)]
    pub fn purge_expired(&self) -> u32 {
        self.accessor.purge_expired() as u32
    }

    /// Only keys under the application namespace.
    pub fn clear(&self) {
        self.accessor.clear();
    }

    pub fn keys(&self) -> Array {
        self.accessor
            .keys()
            .into_iter()
            .map(|key| JsValue::from_str(&key))
            .collect()
    }
}
