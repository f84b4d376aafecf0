use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::accessor::StorageAccessor;
use crate::domain::storage::Ttl;

/// Result of a data-fetching hook: the payload once it arrived, and whether a
/// request is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    pub data: Option<T>,
    pub is_loading: bool,
}

impl<T> Loadable<T> {
    pub fn loading() -> Self {
        Self { data: None, is_loading: true }
    }

    pub fn ready(data: T) -> Self {
        Self { data: Some(data), is_loading: false }
    }

    pub fn empty() -> Self {
        Self { data: None, is_loading: false }
    }
}

impl<T: Serialize + DeserializeOwned + Clone> Loadable<T> {
    /// Fresh data is written to the cache and returned; otherwise the cached
    /// copy (if still alive) stands in.
    pub fn cached_or(&self, accessor: &StorageAccessor, key: impl AsRef<str>, ttl: Option<Ttl>) -> Option<T> {
        let key = key.as_ref();
        match &self.data {
            Some(data) => {
                accessor.set(key, data, ttl);
                Some(data.clone())
            }
            None => accessor.get(key),
        }
    }
}
