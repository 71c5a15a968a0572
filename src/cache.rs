//! In-process read-through cache with absolute expiration.
//!
//! Entries live for a fixed TTL from the moment they were stored and are dropped
//! lazily on the next lookup. Concurrent misses on the same key each call the
//! loader; the last one to finish wins. Failed loads are not stored.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct ExpiringCache<V> {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(e) if e.expires_at > now => return Some(e.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // expired: drop it unless someone refreshed it in between
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(key.into(), entry);
    }

    /// Returns the cached value for `key`, or awaits `load` and caches its success.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(v);
        }

        debug!(key, "cache miss");
        let value = load().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counted(calls: &AtomicUsize) -> Result<usize, String> {
        Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test(start_paused = true)]
    async fn serves_from_cache_until_expiry() {
        let cache = ExpiringCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_try_insert_with("k", || load_counted(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        let second = cache.get_or_try_insert_with("k", || load_counted(&calls)).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        let third = cache.get_or_try_insert_with("k", || load_counted(&calls)).await.unwrap();
        assert_eq!(third, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let cache: ExpiringCache<u32> = ExpiringCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_try_insert_with("k", || async { Err::<u32, _>("upstream down") })
            .await;
        assert_eq!(err, Err("upstream down"));
        assert!(cache.get("k").is_none());

        let ok = cache.get_or_try_insert_with("k", || async { Ok::<_, &str>(7) }).await;
        assert_eq!(ok, Ok(7));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let cache = ExpiringCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 3);

        assert_eq!(cache.get("a"), Some(3));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), None);
    }
}
