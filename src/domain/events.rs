use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::domain::storage::StorageArea;

/// A mutation of a store observed from another browsing context.
///
/// `key == None` means the whole store was cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub area: StorageArea,
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl StorageChange {
    pub fn updated(area: StorageArea, key: &str, new_value: &str) -> Self {
        Self {
            area,
            key: Some(key.to_string()),
            old_value: None,
            new_value: Some(new_value.to_string()),
        }
    }

    pub fn removed(area: StorageArea, key: &str) -> Self {
        Self {
            area,
            key: Some(key.to_string()),
            old_value: None,
            new_value: None,
        }
    }

    pub fn cleared(area: StorageArea) -> Self {
        Self {
            area,
            key: None,
            old_value: None,
            new_value: None,
        }
    }

    /// True when this change can affect `key`.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

pub type ChangeListener = Box<dyn FnMut(&StorageChange)>;

/// Live registration with a [`ChangeSource`]. The listener is released when the
/// guard is dropped or [`Subscription::unsubscribe`] is called.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// False for a [`Subscription::detached`] guard: nothing is listening.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Push-based source of cross-tab storage changes
pub trait ChangeSource {
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

type SharedListener = Rc<RefCell<ChangeListener>>;

#[derive(Default)]
struct ChangeBusInner {
    next_id: u64,
    listeners: Vec<(u64, SharedListener)>,
}

/// In-memory change dispatcher. Stands in for the browser's `storage` event
/// when several simulated tabs share one store.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Rc<RefCell<ChangeBusInner>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, change: &StorageChange) {
        // Snapshot first so listeners may (un)subscribe while being notified.
        let listeners: Vec<SharedListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(change);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl ChangeSource for ChangeBus {
    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(RefCell::new(listener))));
            id
        };
        let weak: Weak<RefCell<ChangeBusInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }
}
