use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use crate::config::StorageConfig;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::errors::{StorageError, StorageResult};
use crate::domain::logging::LogComponent;
use crate::domain::storage::{Decoded, EnvelopeProbe, KeyValueStore, StorageArea, StorageCodec, Ttl};

/// Expiration-aware get/set/remove over one host store.
///
/// Reads never fail from the caller's point of view: absent, expired and
/// malformed entries all come back as `None`. Writes swallow failures after
/// logging them through [`Diagnostics`].
pub struct StorageAccessor {
    area: StorageArea,
    store: Rc<dyn KeyValueStore>,
    codec: StorageCodec,
    diagnostics: Diagnostics,
    prefix: String,
}

impl StorageAccessor {
    pub fn new(
        area: StorageArea,
        store: Rc<dyn KeyValueStore>,
        config: &StorageConfig,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            area,
            store,
            codec: StorageCodec::new(diagnostics.clock()),
            diagnostics,
            prefix: config.key_prefix(),
        }
    }

    pub fn persistent(store: Rc<dyn KeyValueStore>, config: &StorageConfig, diagnostics: Diagnostics) -> Self {
        Self::new(StorageArea::Persistent, store, config, diagnostics)
    }

    pub fn session(store: Rc<dyn KeyValueStore>, config: &StorageConfig, diagnostics: Diagnostics) -> Self {
        Self::new(StorageArea::Session, store, config, diagnostics)
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }

    pub fn codec(&self) -> &StorageCodec {
        &self.codec
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn component(&self) -> LogComponent {
        match self.area {
            StorageArea::Persistent => LogComponent::Application("LocalStorage"),
            StorageArea::Session => LogComponent::Application("SessionStorage"),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Option<T> {
        let key = key.as_ref();
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                self.diagnostics.record_error(self.component(), &e, &format!("read '{key}'"));
                return None;
            }
        };
        self.decode_raw(key, &raw)
    }

    /// Decode text already fetched from the store (or carried by a change
    /// event), evicting the key if it has expired.
    pub fn decode_raw<T: DeserializeOwned>(&self, key: &str, raw: &str) -> Option<T> {
        match self.codec.decode(raw) {
            Decoded::Fresh(value) => Some(value),
            Decoded::Expired => {
                self.diagnostics
                    .debug(self.component(), &format!("⌛ '{key}' expired, evicting"));
                self.remove(key);
                None
            }
            Decoded::Malformed(reason) => {
                self.diagnostics.record_error(
                    self.component(),
                    &StorageError::Parse(reason),
                    &format!("decode '{key}'"),
                );
                None
            }
        }
    }

    /// Encode and write without any recovery.
    pub fn try_set<T: Serialize + ?Sized>(&self, key: impl AsRef<str>, value: &T, ttl: Option<Ttl>) -> StorageResult<()> {
        let raw = self.codec.encode(value, ttl)?;
        self.store.set_item(key.as_ref(), &raw)
    }

    /// Encode and write. On quota exhaustion expired entries are purged and the
    /// write is dropped, not retried.
    pub fn set<T: Serialize + ?Sized>(&self, key: impl AsRef<str>, value: &T, ttl: Option<Ttl>) {
        let key = key.as_ref();
        match self.try_set(key, value, ttl) {
            Ok(()) => {}
            Err(e @ StorageError::QuotaExceeded { .. }) => {
                self.diagnostics.record_error(self.component(), &e, "write dropped");
                let purged = self.purge_expired();
                self.diagnostics.warn(
                    self.component(),
                    &format!("🧹 Quota exceeded for '{key}', purged {purged} expired entries"),
                );
            }
            Err(e) => {
                self.diagnostics
                    .record_error(self.component(), &e, &format!("write '{key}' abandoned"));
            }
        }
    }

    pub fn remove(&self, key: impl AsRef<str>) {
        let key = key.as_ref();
        if let Err(e) = self.store.remove_item(key) {
            self.diagnostics.record_error(self.component(), &e, &format!("remove '{key}'"));
        }
    }

    /// Whether `key` holds anything other than an expired envelope. Expired
    /// entries are evicted on the way.
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        let Ok(Some(raw)) = self.store.get_item(key) else {
            return false;
        };
        if self.codec.probe(&raw) == EnvelopeProbe::Expired {
            self.diagnostics
                .debug(self.component(), &format!("⌛ '{key}' expired, evicting"));
            self.remove(key);
            return false;
        }
        true
    }

    /// Remove every key holding an expired envelope. Live envelopes and
    /// non-envelope data are left alone.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for key in self.keys() {
            let Ok(Some(raw)) = self.store.get_item(&key) else {
                continue;
            };
            if self.codec.probe(&raw) != EnvelopeProbe::Expired {
                continue;
            }
            match self.store.remove_item(&key) {
                Ok(()) => removed += 1,
                Err(e) => self.diagnostics.record_error(self.component(), &e, &format!("purge '{key}'")),
            }
        }
        if removed > 0 {
            self.diagnostics
                .info(self.component(), &format!("Purged {removed} expired entries"));
        }
        removed
    }

    /// Remove every key under this application's namespace.
    pub fn clear(&self) {
        let owned: Vec<String> = self
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(&self.prefix))
            .collect();
        for key in &owned {
            self.remove(key);
        }
        self.diagnostics
            .debug(self.component(), &format!("Cleared {} namespaced keys", owned.len()));
    }

    /// Wipe the whole host store, including keys other code owns.
    pub fn clear_all(&self) {
        if let Err(e) = self.store.clear() {
            self.diagnostics.record_error(self.component(), &e, "clear");
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys().unwrap_or_else(|e| {
            self.diagnostics.record_error(self.component(), &e, "list keys");
            Vec::new()
        })
    }
}
