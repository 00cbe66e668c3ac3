//! TTL-based, type-tagged caching of models and collections.
//!
//! A [`Cache<C>`] decorates one raw key with one expected payload type and
//! one TTL. Writes serialize the payload's full representation inside an
//! envelope that records the model name; reads check that tag before any
//! hydration, so a key collision surfaces as
//! [`CacheError::TypeMismatch`] instead of a confusing conversion error.
//!
//! Two read-side rules carried over from the gateway's reference behavior:
//!
//! - a stale entry (TTL elapsed) is treated as absent;
//! - a hydrated collection with zero elements is also treated as absent,
//!   so callers refetch instead of trusting a cached "nothing found".
//!
//! Backends may be shared across processes; there is no distributed
//! locking. Concurrent writers to one key race and the last writer wins,
//! which is acceptable because cached data is always re-derivable from the
//! gateway and staleness is bounded by the TTL.

use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::convert::{convert, convert_collection};
use crate::error::{CacheError, ValidationError};
use crate::model::Model;
use crate::timestamp::UnixTimestamp;

/// Payloads that can ride the cache wrapper: single models and typed
/// collections.
pub trait Cacheable: Sized {
    /// Model tag stored in the cache envelope.
    fn cache_model_name() -> String;

    /// Rebuilds the payload from its stored JSON representation.
    ///
    /// # Errors
    ///
    /// Returns the hydration failure of the underlying conversion.
    fn hydrate(value: &Value) -> Result<Self, ValidationError>;

    /// Produces the full (`null`-preserving) JSON representation.
    fn dehydrate(&self) -> Value;

    /// Whether this payload counts as "nothing found" on read-back.
    fn is_empty_payload(&self) -> bool;
}

impl<T: Model> Cacheable for T {
    fn cache_model_name() -> String {
        T::model_name().to_owned()
    }

    fn hydrate(value: &Value) -> Result<Self, ValidationError> {
        convert(value)
    }

    fn dehydrate(&self) -> Value {
        self.to_value(true)
    }

    fn is_empty_payload(&self) -> bool {
        false
    }
}

impl<T: Model> Cacheable for Collection<T> {
    fn cache_model_name() -> String {
        format!("{}[]", T::model_name())
    }

    fn hydrate(value: &Value) -> Result<Self, ValidationError> {
        convert_collection(value)
    }

    fn dehydrate(&self) -> Value {
        self.to_value(true)
    }

    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

/// One stored cache record: payload, TTL, and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    payload: String,
    ttl_secs: u64,
    created: UnixTimestamp,
}

impl Entry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(payload: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            payload: payload.into(),
            ttl_secs,
            created: UnixTimestamp::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn backdated(payload: impl Into<String>, ttl_secs: u64, created: UnixTimestamp) -> Self {
        Self {
            payload: payload.into(),
            ttl_secs,
            created,
        }
    }

    /// The stored payload string.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Absolute expiry instant: creation time plus TTL.
    #[must_use]
    pub const fn expires_at(&self) -> UnixTimestamp {
        self.created.saturating_add(self.ttl_secs)
    }

    /// Whether the entry has outlived its TTL at `now`. A TTL of zero
    /// means the entry never expires.
    #[must_use]
    pub fn is_stale(&self, now: UnixTimestamp) -> bool {
        self.ttl_secs != 0 && now >= self.expires_at()
    }
}

/// String-keyed cache store.
///
/// Implementations must route every `read`/`write`/`clear` through
/// [`CacheBackend::decorate_key`], so entries from this SDK never collide
/// with unrelated users sharing the same store. Readers treat stale
/// entries as absent; `clear` of an absent key is not an error.
pub trait CacheBackend: Send + Sync {
    /// Applies the backend's namespacing transform to a raw key.
    fn decorate_key(&self, key: &str) -> String;

    /// Reads the payload stored under `key`, or `None` when absent or
    /// stale.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the store itself fails.
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `payload` under `key` with the given TTL in seconds
    /// (zero = never expire).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the store itself fails.
    fn write(&self, key: &str, payload: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Deletes the entry under `key`; idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the store itself fails.
    fn clear(&self, key: &str) -> Result<(), CacheError>;
}

/// Process-local cache backend over a concurrent map.
#[derive(Debug)]
pub struct MemoryCache {
    prefix: String,
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    /// Default key prefix applied by [`MemoryCache::new`].
    pub const DEFAULT_PREFIX: &'static str = "bankpay_";

    /// Creates a backend with the default key prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    /// Creates a backend with a custom key prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: DashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, key: &str, entry: Entry) {
        self.entries.insert(self.decorate_key(key), entry);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for MemoryCache {
    fn decorate_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let decorated = self.decorate_key(key);
        let now = UnixTimestamp::now();
        let stale = match self.entries.get(&decorated) {
            None => return Ok(None),
            Some(entry) if entry.is_stale(now) => true,
            Some(entry) => return Ok(Some(entry.payload().to_owned())),
        };
        if stale {
            self.entries.remove(&decorated);
        }
        Ok(None)
    }

    fn write(&self, key: &str, payload: &str, ttl_secs: u64) -> Result<(), CacheError> {
        self.entries
            .insert(self.decorate_key(key), Entry::new(payload, ttl_secs));
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(&self.decorate_key(key));
        Ok(())
    }
}

/// Envelope wrapped around every stored payload.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    model: String,
    data: Value,
}

/// Typed cache handle: one key, one expected payload type, one TTL.
pub struct Cache<C: Cacheable> {
    backend: Arc<dyn CacheBackend>,
    key: String,
    ttl_secs: u64,
    _payload: PhantomData<C>,
}

impl<C: Cacheable> std::fmt::Debug for Cache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("key", &self.key)
            .field("model", &C::cache_model_name())
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl<C: Cacheable> Cache<C> {
    /// Creates a handle over `backend` for the given raw key and TTL in
    /// seconds (zero = never expire).
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, key: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            backend,
            key: key.into(),
            ttl_secs,
            _payload: PhantomData,
        }
    }

    /// The raw (pre-decoration) key this handle owns.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Configured TTL in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Reads the cached payload.
    ///
    /// Absent and stale entries yield `None`, as does a stored collection
    /// with zero elements (forcing a refetch).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::TypeMismatch`] for a foreign model tag,
    /// [`CacheError::Decode`] for an unreadable envelope, and
    /// [`CacheError::Convert`] when hydration fails.
    pub fn read(&self) -> Result<Option<C>, CacheError> {
        let Some(raw) = self.backend.read(&self.key)? else {
            return Ok(None);
        };
        let envelope: Envelope = serde_json::from_str(&raw).map_err(CacheError::Decode)?;
        let expected = C::cache_model_name();
        if envelope.model != expected {
            return Err(CacheError::TypeMismatch {
                expected,
                found: envelope.model,
            });
        }
        let payload = C::hydrate(&envelope.data)?;
        if payload.is_empty_payload() {
            return Ok(None);
        }
        Ok(Some(payload))
    }

    /// Serializes and stores `payload` under the configured key and TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Encode`] when serialization fails and
    /// [`CacheError::Backend`] when the store fails.
    pub fn write(&self, payload: &C) -> Result<(), CacheError> {
        let envelope = Envelope {
            model: C::cache_model_name(),
            data: payload.dehydrate(),
        };
        let encoded = serde_json::to_string(&envelope).map_err(CacheError::Encode)?;
        self.backend.write(&self.key, &encoded, self.ttl_secs)
    }

    /// Deletes the entry under the configured key; idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the store fails.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear(&self.key)
    }
}
