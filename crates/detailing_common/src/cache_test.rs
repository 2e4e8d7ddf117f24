#[cfg(test)]
mod tests {
    use crate::cache::{cached, CacheError, CacheStore, MemoryCache};
    use crate::services::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// A store whose every operation fails, standing in for an unreachable remote cache.
    struct BrokenCache;

    impl CacheStore for BrokenCache {
        fn get(&self, _key: &str) -> BoxFuture<'_, Option<String>, CacheError> {
            Box::pin(async { Err(CacheError::Backend("connection refused".into())) })
        }
        fn set(&self, _key: &str, _value: String, _ttl: Duration) -> BoxFuture<'_, (), CacheError> {
            Box::pin(async { Err(CacheError::Backend("connection refused".into())) })
        }
        fn delete(&self, _key: &str) -> BoxFuture<'_, (), CacheError> {
            Box::pin(async { Err(CacheError::Backend("connection refused".into())) })
        }
        fn flush(&self) -> BoxFuture<'_, (), CacheError> {
            Box::pin(async { Err(CacheError::Backend("connection refused".into())) })
        }
    }

    #[tokio::test]
    async fn test_set_get_delete_flush() {
        let cache = MemoryCache::new(100);
        let ttl = Duration::from_secs(60);

        cache.set("a", "1".into(), ttl).await.unwrap();
        cache.set("b", "2".into(), ttl).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap().as_deref(), Some("1"));

        cache.delete("a").await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);

        cache.flush().await.unwrap();
        assert_eq!(cache.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(100);
        cache
            .set("short", "x".into(), Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cache.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_computes_once_then_hits() {
        let cache = MemoryCache::new(100);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Vec<u32>, CacheError> =
                cached(&cache, "numbers", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await;
            assert_eq!(value.unwrap(), vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_bypasses_broken_store() {
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Result<String, CacheError> =
                cached(&BrokenCache, "k", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "fresh");
        }

        // Every call recomputes because nothing could be stored.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_does_not_store_errors() {
        let cache = MemoryCache::new(100);

        let first: Result<u32, String> =
            cached(&cache, "err", Duration::from_secs(60), || async {
                Err("upstream down".to_string())
            })
            .await;
        assert!(first.is_err());
        assert_eq!(cache.get("err").await.unwrap(), None);

        let second: Result<u32, String> =
            cached(&cache, "err", Duration::from_secs(60), || async { Ok(7) }).await;
        assert_eq!(second.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let cache = MemoryCache::new(100);
        cache
            .set("n", "not json".into(), Duration::from_secs(60))
            .await
            .unwrap();

        let value: Result<u32, CacheError> =
            cached(&cache, "n", Duration::from_secs(60), || async { Ok(5) }).await;
        assert_eq!(value.unwrap(), 5);
        assert_eq!(cache.get("n").await.unwrap().as_deref(), Some("5"));
    }
}
