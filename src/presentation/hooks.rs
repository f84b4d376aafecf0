//! Leptos hooks returning the `[value, setValue, removeValue]` triple.

use leptos::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;

use crate::application::{Favorites, RecentItems, SetValue, StorageAccessor, StorageBinding};
use crate::config::StorageConfig;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::errors::StorageError;
use crate::domain::events::ChangeSource;
use crate::domain::storage::{LocalKey, SessionKey, StorageKey};
use crate::infrastructure::events::WindowStorageEvents;
use crate::infrastructure::storage::WebStorage;

/// Everything the hooks need, passed down through Leptos context.
#[derive(Clone)]
pub struct StorageContext {
    pub persistent: Rc<StorageAccessor>,
    pub session: Rc<StorageAccessor>,
    pub changes: Option<Rc<dyn ChangeSource>>,
    pub diagnostics: Diagnostics,
    pub config: StorageConfig,
}

impl StorageContext {
    /// `localStorage` + `sessionStorage` of the current window, with the
    /// window's `storage` event as change source.
    pub fn browser(config: StorageConfig, diagnostics: Diagnostics) -> Result<Self, StorageError> {
        let local = WebStorage::local()?;
        let session = WebStorage::session()?;
        let changes: Rc<dyn ChangeSource> = Rc::new(WindowStorageEvents::new(local.clone()));
        Ok(Self {
            persistent: Rc::new(StorageAccessor::persistent(Rc::new(local), &config, diagnostics.clone())),
            session: Rc::new(StorageAccessor::session(Rc::new(session), &config, diagnostics.clone())),
            changes: Some(changes),
            diagnostics,
            config,
        })
    }

    pub fn recent_stocks(&self) -> RecentItems {
        RecentItems::stocks(Rc::clone(&self.persistent), self.config.recent_limit)
    }

    pub fn recent_crypto(&self) -> RecentItems {
        RecentItems::crypto(Rc::clone(&self.persistent), self.config.recent_limit)
    }

    pub fn favorites(&self) -> Favorites {
        Favorites::new(Rc::clone(&self.persistent))
    }
}

pub fn provide_storage_context(context: StorageContext) {
    provide_context(context);
}

/// Bind `key` of `accessor` to a signal. With `changes`, writes from other
/// tabs flow into the signal; the subscription ends when the owning reactive
/// scope is cleaned up. Areas private to one tab never subscribe.
pub fn use_storage<T>(
    accessor: Rc<StorageAccessor>,
    key: impl Into<StorageKey>,
    default: T,
    changes: Option<&dyn ChangeSource>,
) -> (Signal<T>, Callback<SetValue<T>>, Callback<()>)
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let binding = match changes.filter(|_| accessor.area().is_shared_across_tabs()) {
        Some(changes) => StorageBinding::persistent(accessor, key, default, changes),
        None => StorageBinding::session(accessor, key, default),
    };
    let value = create_rw_signal(binding.value());
    binding.watch(move |next: &T| value.set(next.clone()));

    let binding = Rc::new(RefCell::new(binding));
    let set_value = {
        let binding = Rc::clone(&binding);
        Callback::new(move |next: SetValue<T>| binding.borrow().set_value(next))
    };
    let remove_value = {
        let binding = Rc::clone(&binding);
        Callback::new(move |_: ()| binding.borrow().remove_value())
    };
    on_cleanup(move || {
        if let Ok(mut binding) = binding.try_borrow_mut() {
            binding.unsubscribe();
        }
    });

    (value.into(), set_value, remove_value)
}

pub fn use_local_storage<T>(key: LocalKey, default: T) -> (Signal<T>, Callback<SetValue<T>>, Callback<()>)
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let context = expect_context::<StorageContext>();
    use_storage(Rc::clone(&context.persistent), key, default, context.changes.as_deref())
}

pub fn use_session_storage<T>(key: SessionKey, default: T) -> (Signal<T>, Callback<SetValue<T>>, Callback<()>)
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let context = expect_context::<StorageContext>();
    use_storage(Rc::clone(&context.session), key, default, context.changes.as_deref())
}
