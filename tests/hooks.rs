use corpoview_storage::application::{SetValue, StorageAccessor};
use corpoview_storage::config::StorageConfig;
use corpoview_storage::domain::diagnostics::Diagnostics;
use corpoview_storage::domain::events::{ChangeBus, ChangeSource, StorageChange};
use corpoview_storage::domain::storage::{LocalKey, SessionKey, StorageArea};
use corpoview_storage::domain::time::ManualTimeProvider;
use corpoview_storage::infrastructure::storage::MemoryStore;
use corpoview_storage::presentation::use_storage;
use leptos::*;
use std::rc::Rc;
use std::sync::Arc;

fn tab(store: &MemoryStore) -> Rc<StorageAccessor> {
    let config = StorageConfig::default();
    let diagnostics = Diagnostics::init(&config, Arc::new(ManualTimeProvider::new(0)));
    Rc::new(StorageAccessor::persistent(Rc::new(store.clone()), &config, diagnostics))
}

#[test]
fn hook_triple_tracks_local_and_remote_writes() {
    let runtime = create_runtime();
    let store = MemoryStore::new();
    let bus = ChangeBus::new();
    let tab_b = tab(&store);

    let (theme, set_theme, remove_theme) = use_storage(
        Rc::clone(&tab_b),
        LocalKey::Theme,
        "light".to_string(),
        Some(&bus as &dyn ChangeSource),
    );
    assert_eq!(theme.get_untracked(), "light");
    assert_eq!(bus.subscriber_count(), 1);

    set_theme.call(SetValue::Value("dark".to_string()));
    assert_eq!(theme.get_untracked(), "dark");
    assert_eq!(tab_b.get::<String>(LocalKey::Theme), Some("dark".to_string()));

    let raw = tab(&store).codec().encode("sepia", None).unwrap();
    bus.publish(&StorageChange::updated(StorageArea::Persistent, "corpoview:theme", &raw));
    assert_eq!(theme.get_untracked(), "sepia");

    remove_theme.call(());
    assert_eq!(theme.get_untracked(), "light");
    assert!(!tab_b.contains(LocalKey::Theme));

    runtime.dispose();
}

#[test]
fn session_hook_uses_updaters() {
    let runtime = create_runtime();
    let store = MemoryStore::new();
    let accessor = tab(&store);

    let (count, set_count, _) = use_storage(Rc::clone(&accessor), SessionKey::ChartState, 0u32, None);
    set_count.call(SetValue::update(|n: &u32| n + 1));
    set_count.call(SetValue::update(|n: &u32| n + 1));
    assert_eq!(count.get_untracked(), 2);
    assert_eq!(accessor.get::<u32>(SessionKey::ChartState), Some(2));

    runtime.dispose();
}

#[test]
fn session_hook_ignores_change_source() {
    let runtime = create_runtime();
    let bus = ChangeBus::new();
    let config = StorageConfig::default();
    let diagnostics = Diagnostics::init(&config, Arc::new(ManualTimeProvider::new(0)));
    let session = Rc::new(StorageAccessor::session(Rc::new(MemoryStore::new()), &config, diagnostics));

    let (query, _, _) = use_storage(session, SessionKey::SearchQuery, String::new(), Some(&bus as &dyn ChangeSource));
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(query.get_untracked(), "");

    runtime.dispose();
}
