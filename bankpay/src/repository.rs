//! Read-through repositories over the cache wrapper.
//!
//! A repository "get" first consults its [`Cache`]; on a miss it asks the
//! remote source for raw structural data, hydrates it into the typed
//! payload, writes the result back, and returns it. Conversion failures of
//! fresh gateway data always propagate. The write-back is the one
//! sanctioned degrade site: failing to store a convenience copy must not
//! abort an operation that already has authoritative data in hand.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::{Cache, CacheBackend, Cacheable};
use crate::collection::Collection;
use crate::error::{ApiError, CacheError};
use crate::models::Store;

/// External collaborator producing raw structural data for one resource.
///
/// Implementations wrap the actual HTTP call; cancellation and timeouts
/// are theirs to handle. This crate only sees a call that returns parsed
/// JSON or fails.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetches the resource's raw representation from the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the call fails.
    async fn fetch(&self) -> Result<Value, ApiError>;
}

/// Generic cache-backed repository for one payload type under one key.
#[derive(Debug)]
pub struct CachedRepository<C: Cacheable> {
    cache: Cache<C>,
}

impl<C: Cacheable + Send + Sync> CachedRepository<C> {
    /// Creates a repository over `backend` with the given raw cache key
    /// and TTL in seconds.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, key: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            cache: Cache::new(backend, key, ttl_secs),
        }
    }

    /// The underlying typed cache handle.
    #[must_use]
    pub const fn cache(&self) -> &Cache<C> {
        &self.cache
    }

    /// Returns the payload, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the cache read fails, the remote call
    /// fails, or the fresh response cannot be hydrated.
    pub async fn get(&self, source: &dyn RemoteSource) -> Result<C, ApiError> {
        if let Some(hit) = self.cache.read()? {
            return Ok(hit);
        }
        #[cfg(feature = "telemetry")]
        tracing::debug!(key = self.cache.key(), "cache miss, fetching from gateway");
        self.refresh(source).await
    }

    /// Fetches from the gateway unconditionally and refreshes the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the remote call fails or the response
    /// cannot be hydrated.
    pub async fn refresh(&self, source: &dyn RemoteSource) -> Result<C, ApiError> {
        let raw = source.fetch().await?;
        let payload = C::hydrate(&raw).map_err(ApiError::InvalidBody)?;
        if let Err(_err) = self.cache.write(&payload) {
            // Convenience write only; the fresh data is authoritative and
            // the cache refills on the next call.
            #[cfg(feature = "telemetry")]
            tracing::warn!(
                key = self.cache.key(),
                error = %_err,
                "failed to cache gateway response"
            );
        }
        Ok(payload)
    }

    /// Drops the cached payload.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend fails.
    pub fn invalidate(&self) -> Result<(), CacheError> {
        self.cache.clear()
    }
}

/// Repository for the merchant's store listing.
#[derive(Debug)]
pub struct StoreRepository {
    inner: CachedRepository<Collection<Store>>,
}

impl StoreRepository {
    /// Raw cache key for the store listing.
    pub const STORES_KEY: &'static str = "stores";

    /// Creates the repository with the given TTL in seconds.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_secs: u64) -> Self {
        Self {
            inner: CachedRepository::new(backend, Self::STORES_KEY, ttl_secs),
        }
    }

    /// Returns the merchant's stores, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the lookup fails end to end.
    pub async fn get_stores(&self, source: &dyn RemoteSource) -> Result<Collection<Store>, ApiError> {
        self.inner.get(source).await
    }

    /// Fetches the stores from the gateway, bypassing the cache read.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the remote call or hydration fails.
    pub async fn refresh(&self, source: &dyn RemoteSource) -> Result<Collection<Store>, ApiError> {
        self.inner.refresh(source).await
    }

    /// Drops the cached store listing.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend fails.
    pub fn invalidate(&self) -> Result<(), CacheError> {
        self.inner.invalidate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::models::{Currency, StoreStatus};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        response: Value,
    }

    impl CountingSource {
        fn new(response: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteSource for CountingSource {
        async fn fetch(&self) -> Result<Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn stores_json() -> Value {
        json!([{
            "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
            "name": "Main Street",
            "currency": "SEK",
            "status": "active"
        }])
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
        let source = CountingSource::new(stores_json());

        let first = repository.get_stores(&source).await.unwrap();
        let second = repository.get_stores(&source).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.get(0).unwrap().currency(), Currency::Sek);
        assert_eq!(first.get(0).unwrap().status(), StoreStatus::Active);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_listing_is_refetched_every_time() {
        let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
        let source = CountingSource::new(json!([]));

        let first = repository.get_stores(&source).await.unwrap();
        let second = repository.get_stores(&source).await.unwrap();

        assert!(first.is_empty() && second.is_empty());
        // The empty result is never served from cache.
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
        let source = CountingSource::new(stores_json());

        repository.get_stores(&source).await.unwrap();
        repository.invalidate().unwrap();
        repository.get_stores(&source).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_propagates_as_invalid_body() {
        let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
        let source = CountingSource::new(json!({"not": "a list"}));

        let err = repository.get_stores(&source).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache_read() {
        let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
        let source = CountingSource::new(stores_json());

        repository.get_stores(&source).await.unwrap();
        repository.refresh(&source).await.unwrap();

        assert_eq!(source.calls(), 2);
    }
}
