use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::errors::StorageError;
use crate::domain::time::TimeProvider;

/// Wrapper persisted for every cached entry: `{"value": ..., "expires": ms}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<u64>,
}

impl<T> Envelope<T> {
    pub fn is_expired_at(&self, now: u64) -> bool {
        matches!(self.expires, Some(expires) if now > expires)
    }
}

/// Time-to-live in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ttl(u64);

impl Ttl {
    pub fn secs(value: u64) -> Self {
        Self(value)
    }

    pub fn minutes(value: u64) -> Self {
        Self(value.saturating_mul(60))
    }

    pub fn as_millis(&self) -> u64 {
        self.0.saturating_mul(1000)
    }
}

/// Outcome of reading a stored string back as `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Fresh(T),
    /// Valid envelope past its expiry; the caller should evict the key.
    Expired,
    /// Not an envelope of `T`; treated as a cache miss.
    Malformed(String),
}

impl<T> Decoded<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Fresh(value) => Some(value),
            _ => None,
        }
    }
}

/// Type-agnostic view of a stored string, used when sweeping a whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeProbe {
    Live,
    Expired,
    /// Not an envelope at all (data owned by someone else).
    Foreign,
}

#[derive(Deserialize)]
struct ProbeEnvelope {
    #[allow(dead_code)]
    value: IgnoredAny,
    #[serde(default)]
    expires: Option<u64>,
}

/// Converts values to and from the JSON envelope wire format.
#[derive(Clone)]
pub struct StorageCodec {
    clock: Arc<dyn TimeProvider>,
}

impl StorageCodec {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> u64 {
        self.clock.current_timestamp()
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T, ttl: Option<Ttl>) -> Result<String, StorageError> {
        let expires = ttl.map(|ttl| self.now().saturating_add(ttl.as_millis()));
        serde_json::to_string(&Envelope { value, expires })
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn decode<T: DeserializeOwned>(&self, raw: &str) -> Decoded<T> {
        match serde_json::from_str::<Envelope<T>>(raw) {
            Ok(envelope) if envelope.is_expired_at(self.now()) => Decoded::Expired,
            Ok(envelope) => Decoded::Fresh(envelope.value),
            Err(e) => Decoded::Malformed(e.to_string()),
        }
    }

    pub fn probe(&self, raw: &str) -> EnvelopeProbe {
        match serde_json::from_str::<ProbeEnvelope>(raw) {
            Ok(ProbeEnvelope { expires: Some(expires), .. }) if self.now() > expires => EnvelopeProbe::Expired,
            Ok(_) => EnvelopeProbe::Live,
            Err(_) => EnvelopeProbe::Foreign,
        }
    }
}
