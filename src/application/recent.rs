use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use crate::application::accessor::StorageAccessor;
use crate::domain::storage::{LocalKey, StorageKey};

/// Most-recent-first list persisted under one key (recent stocks, recent crypto).
pub struct RecentItems {
    accessor: Rc<StorageAccessor>,
    key: StorageKey,
    limit: usize,
}

impl RecentItems {
    pub fn new(accessor: Rc<StorageAccessor>, key: impl Into<StorageKey>, limit: usize) -> Self {
        Self {
            accessor,
            key: key.into(),
            limit,
        }
    }

    pub fn stocks(accessor: Rc<StorageAccessor>, limit: usize) -> Self {
        Self::new(accessor, LocalKey::RecentStocks, limit)
    }

    pub fn crypto(accessor: Rc<StorageAccessor>, limit: usize) -> Self {
        Self::new(accessor, LocalKey::RecentCrypto, limit)
    }

    pub fn items<T: DeserializeOwned>(&self) -> Vec<T> {
        self.accessor.get(&self.key).unwrap_or_default()
    }

    /// Move `item` to the front, dropping older duplicates and anything past the limit.
    pub fn push<T>(&self, item: T) -> Vec<T>
    where
        T: Serialize + DeserializeOwned + PartialEq,
    {
        let mut items: Vec<T> = self.items();
        items.retain(|existing| existing != &item);
        items.insert(0, item);
        items.truncate(self.limit);
        self.accessor.set(&self.key, &items, None);
        items
    }

    pub fn clear(&self) {
        self.accessor.remove(&self.key);
    }
}

/// Persisted set of favourite symbols, kept in insertion order.
pub struct Favorites {
    accessor: Rc<StorageAccessor>,
}

impl Favorites {
    pub fn new(accessor: Rc<StorageAccessor>) -> Self {
        Self { accessor }
    }

    pub fn items(&self) -> Vec<String> {
        self.accessor.get(LocalKey::Favorites).unwrap_or_default()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items().iter().any(|existing| existing == item)
    }

    /// Add or remove `item`. Returns whether it is a favourite afterwards.
    pub fn toggle(&self, item: &str) -> bool {
        let mut items = self.items();
        let now_favorite = match items.iter().position(|existing| existing == item) {
            Some(index) => {
                items.remove(index);
                false
            }
            None => {
                items.push(item.to_string());
                true
            }
        };
        self.accessor.set(LocalKey::Favorites, &items, None);
        now_favorite
    }
}
