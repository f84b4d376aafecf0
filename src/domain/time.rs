use std::sync::atomic::{AtomicU64, Ordering};

/// Domain abstraction for time service
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn current_timestamp(&self) -> u64;

    fn format_timestamp(&self, timestamp: u64) -> String {
        let secs = timestamp / 1000;
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60,
            timestamp % 1000
        )
    }
}

/// Virtual clock driven by the caller.
///
/// Expiry logic is exercised by advancing this clock instead of sleeping.
#[derive(Debug, Default)]
pub struct ManualTimeProvider {
    now: AtomicU64,
}

impl ManualTimeProvider {
    pub fn new(start_millis: u64) -> Self {
        Self { now: AtomicU64::new(start_millis) }
    }

    pub fn advance_millis(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_secs_f64(&self, secs: f64) {
        self.advance_millis((secs * 1000.0).round() as u64);
    }

    pub fn set_millis(&self, value: u64) {
        self.now.store(value, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualTimeProvider {
    fn current_timestamp(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
