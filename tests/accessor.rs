use corpoview_storage::application::StorageAccessor;
use corpoview_storage::config::StorageConfig;
use corpoview_storage::domain::diagnostics::Diagnostics;
use corpoview_storage::domain::logging::LogComponent;
use corpoview_storage::domain::storage::{KeyValueStore, LocalKey, StorageArea, Ttl};
use corpoview_storage::domain::time::ManualTimeProvider;
use corpoview_storage::infrastructure::storage::MemoryStore;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use std::rc::Rc;
use std::sync::Arc;

const START: u64 = 1_700_000_000_000;

fn setup_with(store: MemoryStore) -> (Arc<ManualTimeProvider>, MemoryStore, StorageAccessor) {
    let clock = Arc::new(ManualTimeProvider::new(START));
    let config = StorageConfig::development();
    let diagnostics = Diagnostics::init(&config, clock.clone());
    let accessor = StorageAccessor::persistent(Rc::new(store.clone()), &config, diagnostics);
    (clock, store, accessor)
}

fn setup() -> (Arc<ManualTimeProvider>, MemoryStore, StorageAccessor) {
    setup_with(MemoryStore::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChartPreferences {
    interval: String,
    show_volume: bool,
    indicators: Vec<String>,
}

#[test]
fn set_then_get_returns_equal_value() {
    let (_, _, accessor) = setup();
    let prefs = ChartPreferences {
        interval: "1d".to_string(),
        show_volume: true,
        indicators: vec!["SMA20".to_string(), "RSI".to_string()],
    };
    accessor.set(LocalKey::ChartPreferences, &prefs, None);
    assert_eq!(accessor.get::<ChartPreferences>(LocalKey::ChartPreferences), Some(prefs));
    assert_eq!(accessor.area(), StorageArea::Persistent);
}

#[test]
fn ttl_scenario() {
    let (clock, _, accessor) = setup();
    accessor.set("corpoview:test", &json!({"a": 1}), Some(Ttl::secs(1)));
    assert_eq!(accessor.get::<serde_json::Value>("corpoview:test"), Some(json!({"a": 1})));

    clock.advance_secs_f64(1.1);
    assert_eq!(accessor.get::<serde_json::Value>("corpoview:test"), None);
    assert!(!accessor.keys().contains(&"corpoview:test".to_string()));
}

#[test]
fn expired_key_is_not_revived_by_time_going_back() {
    let (clock, store, accessor) = setup();
    accessor.set("corpoview:quote:AAPL", &189.5_f64, Some(Ttl::secs(30)));
    clock.advance_millis(30_001);
    assert_eq!(accessor.get::<f64>("corpoview:quote:AAPL"), None);
    clock.set_millis(START);
    assert_eq!(accessor.get::<f64>("corpoview:quote:AAPL"), None);
    assert_eq!(store.raw("corpoview:quote:AAPL"), None);
}

#[test]
fn contains_treats_expired_entries_as_absent() {
    let (clock, store, accessor) = setup();
    accessor.set("corpoview:x", &1, Some(Ttl::secs(1)));
    assert!(accessor.contains("corpoview:x"));

    clock.advance_millis(5_000);
    assert!(!accessor.contains("corpoview:x"));
    assert_eq!(store.raw("corpoview:x"), None);
}

#[test]
fn remove_is_idempotent() {
    let (_, _, accessor) = setup();
    accessor.set(LocalKey::Theme, "dark", None);
    accessor.remove(LocalKey::Theme);
    assert_eq!(accessor.get::<String>(LocalKey::Theme), None);
    accessor.remove(LocalKey::Theme);
    accessor.remove("corpoview:never-written");
    assert!(accessor.keys().is_empty());
    assert_eq!(accessor.diagnostics().errors().total(), 0);
}

#[test]
fn malformed_entries_are_cache_misses_and_kept() {
    let (_, store, accessor) = setup();
    store.set_item("corpoview:filters", "{broken").unwrap();
    store.set_item("corpoview:theme", r#"{"value":42}"#).unwrap();

    assert_eq!(accessor.get::<Vec<String>>("corpoview:filters"), None);
    // valid envelope, wrong type for the caller
    assert_eq!(accessor.get::<String>("corpoview:theme"), None);

    assert!(accessor.contains("corpoview:filters"));
    assert!(accessor.contains("corpoview:theme"));
    assert_eq!(accessor.diagnostics().errors().count("Parse"), 2);
}

#[test]
fn purge_removes_only_expired_envelopes() {
    let (clock, store, accessor) = setup();
    accessor.set("corpoview:short", &1, Some(Ttl::secs(1)));
    accessor.set("corpoview:long", &2, Some(Ttl::secs(600)));
    accessor.set("corpoview:forever", &3, None);
    store.set_item("third-party", "plain text").unwrap();
    store.set_item("corpoview:legacy", r#"{"theme":"dark"}"#).unwrap();

    clock.advance_millis(5_000);
    assert_eq!(accessor.purge_expired(), 1);
    assert_eq!(
        accessor.keys(),
        vec!["corpoview:forever", "corpoview:legacy", "corpoview:long", "third-party"]
    );
    assert_eq!(accessor.purge_expired(), 0);
}

#[test]
fn clear_is_scoped_to_namespace() {
    let (_, store, accessor) = setup();
    accessor.set(LocalKey::Theme, "dark", None);
    accessor.set(LocalKey::Favorites, &["AAPL"], None);
    store.set_item("other-app:session", "x").unwrap();

    accessor.clear();
    assert_eq!(accessor.keys(), vec!["other-app:session"]);

    accessor.set(LocalKey::Theme, "dark", None);
    accessor.clear_all();
    assert!(accessor.keys().is_empty());
}

#[test]
fn quota_exceeded_purges_and_drops_the_write() {
    let (clock, store, accessor) = setup_with(MemoryStore::with_quota(160));
    accessor.set("corpoview:stale", &"x".repeat(40), Some(Ttl::secs(1)));
    accessor.set(LocalKey::Theme, "dark", None);
    let before = store.usage();
    clock.advance_millis(2_000);

    accessor.set("corpoview:huge", &"y".repeat(500), None);

    assert_eq!(accessor.get::<String>("corpoview:huge"), None);
    assert_eq!(store.raw("corpoview:stale"), None);
    assert_eq!(accessor.get::<String>(LocalKey::Theme), Some("dark".to_string()));
    assert!(store.usage() < before);
    assert_eq!(accessor.diagnostics().errors().count("QuotaExceeded"), 1);
}

#[test]
fn try_set_surfaces_quota_errors() {
    let (_, _, accessor) = setup_with(MemoryStore::with_quota(8));
    let result = accessor.try_set("corpoview:big", &"z".repeat(64), None);
    assert!(matches!(
        result,
        Err(corpoview_storage::domain::errors::StorageError::QuotaExceeded { .. })
    ));
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("circular reference"))
    }
}

#[test]
fn serialization_failure_abandons_write() {
    let (_, _, accessor) = setup();
    accessor.set(LocalKey::Preferences, &json!({"old": true}), None);
    accessor.set(LocalKey::Preferences, &Unserializable, None);

    assert_eq!(
        accessor.get::<serde_json::Value>(LocalKey::Preferences),
        Some(json!({"old": true}))
    );
    let errors = accessor.diagnostics().errors();
    assert_eq!(errors.count("Serialization"), 1);
    assert!(errors.last().unwrap().message.contains("circular reference"));
}

#[test]
fn session_flavor_logs_under_its_own_component() {
    let clock = Arc::new(ManualTimeProvider::new(START));
    let config = StorageConfig::development();
    let diagnostics = Diagnostics::init(&config, clock.clone());
    let accessor = StorageAccessor::session(Rc::new(MemoryStore::new()), &config, diagnostics.clone());
    accessor.set("corpoview:chart:state", &1, Some(Ttl::secs(1)));
    assert_eq!(accessor.get::<u8>("corpoview:chart:state"), Some(1));
    assert!(diagnostics.logs().is_empty());

    clock.advance_millis(2_000);
    assert_eq!(accessor.get::<u8>("corpoview:chart:state"), None);
    let logs = diagnostics.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].component, LogComponent::Application("SessionStorage"));
    assert!(logs[0].message.contains("expired"));
    assert_eq!(accessor.area(), StorageArea::Session);
}
