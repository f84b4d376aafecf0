//! Explicitly constructed logging and error-tracking service.
//!
//! A [`Diagnostics`] value is created once with [`Diagnostics::init`] and handed
//! to every accessor that needs it. Clones share the same buffers.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::domain::errors::StorageError;
use crate::domain::logging::{LogBuffer, LogComponent, LogEntry, LogLevel, Logger};
use crate::domain::time::TimeProvider;

/// One tracked failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub timestamp: u64,
    pub kind: String,
    pub component: LogComponent,
    pub message: String,
}

/// Counts failures by kind and keeps the most recent ones.
pub struct ErrorTracker {
    history: usize,
    recent: RefCell<VecDeque<ErrorRecord>>,
    counts: RefCell<BTreeMap<String, usize>>,
}

impl ErrorTracker {
    pub fn new(history: usize) -> Self {
        Self {
            history,
            recent: RefCell::new(VecDeque::new()),
            counts: RefCell::new(BTreeMap::new()),
        }
    }

    fn record(&self, record: ErrorRecord) {
        *self.counts.borrow_mut().entry(record.kind.clone()).or_insert(0) += 1;
        if self.history == 0 {
            return;
        }
        let mut recent = self.recent.borrow_mut();
        while recent.len() >= self.history {
            recent.pop_front();
        }
        recent.push_back(record);
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.borrow().get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.borrow().values().sum()
    }

    pub fn recent(&self) -> Vec<ErrorRecord> {
        self.recent.borrow().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<ErrorRecord> {
        self.recent.borrow().back().cloned()
    }

    fn reset(&self) {
        self.recent.borrow_mut().clear();
        self.counts.borrow_mut().clear();
    }
}

struct DiagnosticsInner {
    clock: Arc<dyn TimeProvider>,
    min_level: LogLevel,
    sinks: RefCell<Vec<Box<dyn Logger>>>,
    buffer: LogBuffer,
    errors: ErrorTracker,
}

#[derive(Clone)]
pub struct Diagnostics {
    inner: Rc<DiagnosticsInner>,
}

impl Diagnostics {
    pub fn init(config: &StorageConfig, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            inner: Rc::new(DiagnosticsInner {
                clock,
                min_level: config.min_log_level,
                sinks: RefCell::new(Vec::new()),
                buffer: LogBuffer::new(config.log_buffer_capacity),
                errors: ErrorTracker::new(config.error_history),
            }),
        }
    }

    /// Attach an extra sink (console, UI bridge, ...).
    pub fn add_sink(&self, sink: Box<dyn Logger>) {
        self.inner.sinks.borrow_mut().push(sink);
    }

    pub fn with_sink(self, sink: Box<dyn Logger>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Drop buffered logs and tracked errors. Sinks and clock are kept.
    pub fn reset(&self) {
        self.inner.buffer.clear();
        self.inner.errors.reset();
    }

    pub fn clock(&self) -> Arc<dyn TimeProvider> {
        Arc::clone(&self.inner.clock)
    }

    pub fn now(&self) -> u64 {
        self.inner.clock.current_timestamp()
    }

    pub fn log(&self, entry: LogEntry) {
        if entry.level < self.inner.min_level {
            return;
        }
        self.inner.buffer.log(&entry);
        for sink in self.inner.sinks.borrow().iter() {
            sink.log(&entry);
        }
    }

    fn emit(&self, level: LogLevel, component: LogComponent, message: &str) {
        self.log(LogEntry::new(self.now(), level, component, message));
    }

    pub fn trace(&self, component: LogComponent, message: &str) {
        self.emit(LogLevel::Trace, component, message);
    }

    pub fn debug(&self, component: LogComponent, message: &str) {
        self.emit(LogLevel::Debug, component, message);
    }

    pub fn info(&self, component: LogComponent, message: &str) {
        self.emit(LogLevel::Info, component, message);
    }

    pub fn warn(&self, component: LogComponent, message: &str) {
        self.emit(LogLevel::Warn, component, message);
    }

    pub fn error(&self, component: LogComponent, message: &str) {
        self.emit(LogLevel::Error, component, message);
    }

    /// Log a failure and count it. Parse failures are cache misses, so they log
    /// at warn level; everything else is an error.
    pub fn record_error(&self, component: LogComponent, error: &StorageError, context: &str) {
        let level = match error {
            StorageError::Parse(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        };
        let timestamp = self.now();
        let message = format!("{}: {}", context, error);
        self.log(LogEntry::new(timestamp, level, component.clone(), &message).with_metadata(error.kind()));
        self.inner.errors.record(ErrorRecord {
            timestamp,
            kind: error.kind().to_string(),
            component,
            message,
        });
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.buffer.snapshot()
    }

    pub fn errors(&self) -> &ErrorTracker {
        &self.inner.errors
    }
}
