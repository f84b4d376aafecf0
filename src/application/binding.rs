//! Reactive `[value, setValue, removeValue]` binding over a [`StorageAccessor`].
//!
//! The binding owns the UI-side copy of the value. It does not depend on any UI
//! framework: frameworks mirror it through [`StorageBinding::watch`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::accessor::StorageAccessor;
use crate::domain::errors::StorageError;
use crate::domain::events::{ChangeSource, StorageChange, Subscription};
use crate::domain::logging::LogComponent;
use crate::domain::storage::{Decoded, StorageKey, Ttl};

/// New value for a binding: either a replacement or an updater that receives
/// the UI-held value.
pub enum SetValue<T> {
    Value(T),
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> SetValue<T> {
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        SetValue::Update(Box::new(f))
    }

    fn apply(self, current: &T) -> T {
        match self {
            SetValue::Value(value) => value,
            SetValue::Update(f) => f(current),
        }
    }
}

impl<T> From<T> for SetValue<T> {
    fn from(value: T) -> Self {
        SetValue::Value(value)
    }
}

type Watcher<T> = Rc<dyn Fn(&T)>;

struct BindingState<T> {
    value: RefCell<T>,
    default: T,
    watchers: RefCell<Vec<Watcher<T>>>,
}

impl<T: Clone> BindingState<T> {
    fn replace(&self, next: T) {
        *self.value.borrow_mut() = next.clone();
        let watchers: Vec<Watcher<T>> = self.watchers.borrow().iter().cloned().collect();
        for watcher in watchers {
            watcher(&next);
        }
    }

    fn reset(&self) {
        self.replace(self.default.clone());
    }
}

pub struct StorageBinding<T> {
    key: StorageKey,
    accessor: Rc<StorageAccessor>,
    ttl: Option<Ttl>,
    state: Rc<BindingState<T>>,
    subscription: Option<Subscription>,
}

impl<T> StorageBinding<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    /// Binding without cross-tab synchronization (the session variant).
    pub fn new(accessor: Rc<StorageAccessor>, key: impl Into<StorageKey>, default: T) -> Self {
        let key = key.into();
        let initial = accessor.get::<T>(&key).unwrap_or_else(|| default.clone());
        Self {
            key,
            accessor,
            ttl: None,
            state: Rc::new(BindingState {
                value: RefCell::new(initial),
                default,
                watchers: RefCell::new(Vec::new()),
            }),
            subscription: None,
        }
    }

    pub fn session(accessor: Rc<StorageAccessor>, key: impl Into<StorageKey>, default: T) -> Self {
        Self::new(accessor, key, default)
    }

    /// Binding that follows writes made by other tabs.
    pub fn persistent(
        accessor: Rc<StorageAccessor>,
        key: impl Into<StorageKey>,
        default: T,
        changes: &dyn ChangeSource,
    ) -> Self {
        Self::new(accessor, key, default).synced_with(changes)
    }

    /// Subscribe to `changes`. Any earlier subscription is released first.
    pub fn synced_with(mut self, changes: &dyn ChangeSource) -> Self {
        self.subscription = None;
        let state = Rc::downgrade(&self.state);
        let accessor = Rc::downgrade(&self.accessor);
        let key = self.key.clone();
        let area = self.accessor.area();
        let subscription = changes.subscribe(Box::new(move |change| {
            if change.area == area {
                apply_remote_change::<T>(&state, &accessor, &key, change);
            }
        }));
        if subscription.is_active() {
            self.subscription = Some(subscription);
        } else {
            self.accessor.diagnostics().warn(
                LogComponent::Application("StorageBinding"),
                &format!("No change listener available, '{}' will not follow other tabs", self.key),
            );
        }
        self
    }

    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn key(&self) -> &str {
        self.key.value()
    }

    pub fn is_synced(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn value(&self) -> T {
        self.state.value.borrow().clone()
    }

    pub fn default_value(&self) -> &T {
        &self.state.default
    }

    /// Update the UI value synchronously, then persist it.
    pub fn set_value(&self, next: impl Into<SetValue<T>>) {
        let next = {
            let current = self.state.value.borrow();
            next.into().apply(&current)
        };
        self.state.replace(next.clone());
        self.accessor.set(&self.key, &next, self.ttl);
    }

    /// Back to the default, and drop the stored entry.
    pub fn remove_value(&self) {
        self.state.reset();
        self.accessor.remove(&self.key);
    }

    /// Called with the new UI value after every change, local or remote.
    pub fn watch(&self, watcher: impl Fn(&T) + 'static) {
        self.state.watchers.borrow_mut().push(Rc::new(watcher));
    }

    /// Release the change subscription now instead of on drop.
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

fn apply_remote_change<T>(
    state: &Weak<BindingState<T>>,
    accessor: &Weak<StorageAccessor>,
    key: &str,
    change: &StorageChange,
) where
    T: DeserializeOwned + Clone,
{
    if !change.concerns(key) {
        return;
    }
    let (Some(state), Some(accessor)) = (state.upgrade(), accessor.upgrade()) else {
        return;
    };
    let component = LogComponent::Application("StorageBinding");
    let Some(raw) = change.new_value.as_deref().filter(|_| change.key.is_some()) else {
        accessor
            .diagnostics()
            .debug(component, &format!("🔄 '{key}' removed in another tab"));
        state.reset();
        return;
    };
    match accessor.codec().decode::<T>(raw) {
        Decoded::Fresh(value) => {
            accessor
                .diagnostics()
                .debug(component, &format!("🔄 '{key}' updated in another tab"));
            state.replace(value);
        }
        Decoded::Expired => state.reset(),
        Decoded::Malformed(reason) => {
            accessor.diagnostics().record_error(
                component,
                &StorageError::Parse(reason),
                &format!("remote change for '{key}' ignored"),
            );
        }
    }
}
