use crate::domain::logging::{LogEntry, LogLevel, Logger};
use crate::domain::time::TimeProvider;

/// Wall clock: `Date.now()` in the browser, the system clock elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    #[cfg(target_arch = "wasm32")]
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn current_timestamp(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    #[cfg(target_arch = "wasm32")]
    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&(timestamp as f64).into());
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Console logger implementation for WASM environment
pub struct ConsoleLogger {
    min_level: LogLevel,
    clock: BrowserTimeProvider,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level, clock: BrowserTimeProvider }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let formatted = entry.format_with(&self.clock.format_timestamp(entry.timestamp));

        #[cfg(target_arch = "wasm32")]
        {
            let formatted = wasm_bindgen::JsValue::from_str(&formatted);
            match entry.level {
                LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&formatted),
                LogLevel::Info => web_sys::console::info_1(&formatted),
                LogLevel::Warn => web_sys::console::warn_1(&formatted),
                LogLevel::Error => web_sys::console::error_1(&formatted),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{formatted}");
    }
}
