//! TTL-backed browser storage for the CorpoView dashboard.
//!
//! Layering follows the rest of the front-end: `domain` holds the envelope
//! codec, keys and service traits, `infrastructure` the browser and in-memory
//! stores, `application` the accessors and bindings, `presentation` the Leptos
//! hooks and the JavaScript surface.

use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::application::StorageAccessor;
use crate::config::StorageConfig;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::logging::LogComponent;
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};
use crate::infrastructure::storage::WebStorage;

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

/// Initialize panic reporting and sweep expired cache entries
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let config = StorageConfig::development();
    let diagnostics = Diagnostics::init(&config, Arc::new(BrowserTimeProvider::new()))
        .with_sink(Box::new(ConsoleLogger::new(config.min_log_level)));

    if config.purge_on_startup {
        let purged = purge_expired_with(&config, &diagnostics);
        diagnostics.info(
            LogComponent::Presentation("Initialize"),
            &format!("🚀 Storage initialized, {purged} expired entries purged"),
        );
    }
}

/// Purge expired envelopes from both `localStorage` and `sessionStorage`.
#[wasm_bindgen(js_name = purgeExpiredStorage)]
pub fn purge_expired_storage() -> u32 {
    let config = StorageConfig::production();
    let diagnostics = Diagnostics::init(&config, Arc::new(BrowserTimeProvider::new()))
        .with_sink(Box::new(ConsoleLogger::new_production()));
    purge_expired_with(&config, &diagnostics) as u32
}

fn purge_expired_with(config: &StorageConfig, diagnostics: &Diagnostics) -> usize {
    let mut purged = 0;
    match WebStorage::local() {
        Ok(local) => {
            purged += StorageAccessor::persistent(Rc::new(local), config, diagnostics.clone()).purge_expired();
        }
        Err(e) => diagnostics.record_error(LogComponent::Presentation("Initialize"), &e, "open localStorage"),
    }
    match WebStorage::session() {
        Ok(session) => {
            purged += StorageAccessor::session(Rc::new(session), config, diagnostics.clone()).purge_expired();
        }
        Err(e) => diagnostics.record_error(LogComponent::Presentation("Initialize"), &e, "open sessionStorage"),
    }
    purged
}
