//! Browser `storage` event adapter.
//!
//! The host fires `storage` on every *other* tab of the origin after a write to
//! `localStorage`; the tab that wrote never sees its own event.

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::StorageEvent;

use crate::domain::events::{ChangeListener, ChangeSource, StorageChange, Subscription};
use crate::infrastructure::storage::WebStorage;

/// [`ChangeSource`] backed by `window.addEventListener("storage", ...)`.
///
/// Events are filtered to the storage area this source was opened for.
pub struct WindowStorageEvents {
    storage: WebStorage,
}

impl WindowStorageEvents {
    pub fn new(storage: WebStorage) -> Self {
        Self { storage }
    }

    fn to_change(&self, event: &StorageEvent) -> Option<StorageChange> {
        let area = event.storage_area()?;
        let theirs: &JsValue = area.as_ref();
        let ours: &JsValue = self.storage.raw().as_ref();
        if theirs != ours {
            return None;
        }
        Some(StorageChange {
            area: self.storage.area(),
            key: event.key(),
            old_value: event.old_value(),
            new_value: event.new_value(),
        })
    }
}

impl ChangeSource for WindowStorageEvents {
    fn subscribe(&self, mut listener: ChangeListener) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::detached();
        };
        let source = WindowStorageEvents { storage: self.storage.clone() };
        let handle = EventListener::new(&window, "storage", move |event| {
            if let Some(change) = event
                .dyn_ref::<StorageEvent>()
                .and_then(|event| source.to_change(event))
            {
                listener(&change);
            }
        });
        // EventListener removes itself from the window on drop.
        Subscription::new(move || drop(handle))
    }
}
