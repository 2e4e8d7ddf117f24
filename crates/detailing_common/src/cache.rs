//! String-keyed TTL cache and the get-or-compute helper wrapped around calendar reads.
//!
//! Cache failures never fail a request: reads that error or fail to decode are
//! treated as misses, and writes that error are logged and dropped.
//!
//! There is no single-flight guarantee. Two requests missing the same key at the
//! same time both run `compute` and both write; the second write wins. Calendar
//! window reads are idempotent, so this race is accepted.

use moka::future::Cache;
use moka::Expiry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::BoxFuture;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Minimal key-value store contract: get, set-with-TTL, delete, flush.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<String>, CacheError>;

    fn set(&self, key: &str, value: String, ttl: Duration) -> BoxFuture<'_, (), CacheError>;

    fn delete(&self, key: &str) -> BoxFuture<'_, (), CacheError>;

    fn flush(&self) -> BoxFuture<'_, (), CacheError>;
}

#[derive(Clone)]
struct CachedValue {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process `CacheStore` backed by moka.
pub struct MemoryCache {
    inner: Cache<String, CachedValue>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<String>, CacheError> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.inner.get(&key).await.map(|cached| cached.value)) })
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> BoxFuture<'_, (), CacheError> {
        let key = key.to_string();
        Box::pin(async move {
            if ttl.is_zero() {
                self.inner.invalidate(&key).await;
                return Ok(());
            }
            self.inner.insert(key, CachedValue { value, ttl }).await;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, (), CacheError> {
        let key = key.to_string();
        Box::pin(async move {
            self.inner.invalidate(&key).await;
            Ok(())
        })
    }

    fn flush(&self) -> BoxFuture<'_, (), CacheError> {
        Box::pin(async move {
            self.inner.invalidate_all();
            Ok(())
        })
    }
}

/// Returns the cached value for `key`, or runs `compute` and stores its result.
///
/// Errors from `compute` are returned untouched and nothing is cached for them.
pub async fn cached<T, E, F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!("cache hit for {}", key);
                return Ok(value);
            }
            Err(e) => warn!("discarding undecodable cache entry {}: {}", key, e),
        },
        Ok(None) => debug!("cache miss for {}", key),
        Err(e) => warn!("cache read failed for {}, computing uncached: {}", key, e),
    }

    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = store.set(key, raw, ttl).await {
                warn!("cache write failed for {}: {}", key, e);
            }
        }
        Err(e) => warn!("could not serialize value for {}: {}", key, e),
    }

    Ok(value)
}
