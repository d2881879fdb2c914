use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use folio_core::{Error, Result};
use moka::future::Cache;
use tracing::{debug, warn};

use crate::key::QueryKey;
use crate::state::QueryState;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Upper bound on cached queries.
    pub max_capacity: u64,
    /// Age after which a cached result is reloaded on the next fetch.
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 256,
            stale_time: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Clone)]
struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

impl Entry {
    fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            fetched_at: Instant::now(),
        }
    }

    fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }
}

/// Explicitly owned query cache; share it behind an `Arc`.
///
/// Fresh results live in `fresh`, where moka also coalesces concurrent
/// loads of one key. Invalidated results move to `stale` so views can keep
/// showing them while the reload runs.
///
/// Every key carries a generation that invalidation bumps. A load that
/// started under an older generation lands in `stale`, never in `fresh`.
pub struct QueryCache {
    fresh: Cache<QueryKey, Entry>,
    stale: Cache<QueryKey, Entry>,
    tracked: Mutex<HashMap<QueryKey, Tracked>>,
    config: QueryConfig,
}

#[derive(Debug, Default)]
struct Tracked {
    generation: u64,
    /// Failure of the last settled load, cleared by the next success.
    error: Option<Arc<Error>>,
}

impl QueryCache {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            fresh: Cache::new(config.max_capacity),
            stale: Cache::new(config.max_capacity),
            tracked: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn tracked(&self) -> MutexGuard<'_, HashMap<QueryKey, Tracked>> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self, key: &QueryKey) -> u64 {
        self.tracked().entry(key.clone()).or_default().generation
    }

    fn settle(&self, key: &QueryKey, error: Option<Arc<Error>>) {
        self.tracked().entry(key.clone()).or_default().error = error;
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        entry.fetched_at.elapsed() >= self.config.stale_time
    }

    async fn retire(&self, key: &QueryKey, entry: Entry) {
        self.stale.insert(key.clone(), entry).await;
        self.fresh.invalidate(key).await;
    }

    /// Serve `key` from the cache, or run `loader` and cache its result.
    ///
    /// Concurrent fetches of the same key share one loader run. Failed loads
    /// are not cached, so the next fetch tries again.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(entry) = self.fresh.get(&key).await {
            if !self.is_expired(&entry) {
                if let Some(value) = entry.downcast::<T>() {
                    debug!("Query {} served from cache", key);
                    return QueryState::Success(value);
                }
            }
            debug!("Query {} is stale, reloading", key);
            self.retire(&key, entry).await;
        }

        let started = self.generation(&key);
        let loaded = self
            .fresh
            .try_get_with(key.clone(), async move { loader().await.map(Entry::new) })
            .await;

        match loaded {
            Ok(entry) => match entry.downcast::<T>() {
                Some(value) => {
                    self.settle(&key, None);
                    if self.generation(&key) == started {
                        debug!("Query {} loaded", key);
                        self.stale.invalidate(&key).await;
                    } else {
                        debug!("Query {} was invalidated while loading", key);
                        self.retire(&key, entry).await;
                    }
                    QueryState::Success(value)
                }
                None => QueryState::Error(Arc::new(Error::Storage(format!(
                    "Query {} holds a value of another type",
                    key
                )))),
            },
            Err(err) => {
                warn!("Query {} failed: {}", key, err);
                self.settle(&key, Some(err.clone()));
                QueryState::Error(err)
            }
        }
    }

    /// What `key` shows before a fetch answers: cached data that is still
    /// fresh as `Success`, the last failure if nothing is held, otherwise
    /// `Pending` with whatever older data is still held.
    pub async fn snapshot<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        if let Some(entry) = self.fresh.get(key).await {
            if !self.is_expired(&entry) {
                if let Some(value) = entry.downcast::<T>() {
                    return QueryState::Success(value);
                }
            }
        }
        let previous = self.cached::<T>(key).await;
        if previous.is_none() {
            let error = self.tracked().get(key).and_then(|slot| slot.error.clone());
            if let Some(err) = error {
                return QueryState::Error(err);
            }
        }
        QueryState::Pending { previous }
    }

    async fn cached<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        match self.fresh.get(key).await {
            Some(entry) => entry.downcast::<T>(),
            None => self.stale.get(key).await.and_then(|entry| entry.downcast::<T>()),
        }
    }

    /// True when `key` holds only data that has been invalidated or has aged out.
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        match self.fresh.get(key).await {
            Some(entry) => self.is_expired(&entry),
            None => self.stale.contains_key(key),
        }
    }

    /// Mark every query whose key starts with `prefix` as stale, including
    /// loads still in flight. The next fetch of those keys reloads. Returns
    /// how many queries were marked.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let marked = {
            let mut tracked = self.tracked();
            let mut marked = 0;
            for (key, slot) in tracked.iter_mut() {
                if key.starts_with(prefix) {
                    slot.generation += 1;
                    marked += 1;
                }
            }
            marked
        };

        let matching: Vec<(Arc<QueryKey>, Entry)> = self
            .fresh
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();
        for (key, entry) in &matching {
            self.retire(key, entry.clone()).await;
        }
        debug!("Invalidated {} queries under {}", marked, prefix);
        marked
    }

    /// Forget everything, as a full reload would.
    pub fn clear(&self) {
        for slot in self.tracked().values_mut() {
            slot.generation += 1;
            slot.error = None;
        }
        self.fresh.invalidate_all();
        self.stale.invalidate_all();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<u32> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_cached_result_skips_loader() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(["numbers"]);

        let first = cache.fetch(key.clone(), || counted(&calls, 1)).await;
        let second = cache.fetch(key.clone(), || counted(&calls, 2)).await;

        assert_eq!(first.data(), Some(&1));
        assert_eq!(second.data(), Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.snapshot::<u32>(&key).await.is_success());
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_load() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(["numbers"]);

        let (a, b) = tokio::join!(
            cache.fetch(key.clone(), || counted(&calls, 5)),
            cache.fetch(key.clone(), || counted(&calls, 6)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.data(), b.data());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::default();
        let key = QueryKey::new(["flaky"]);

        let failed: QueryState<u32> = cache
            .fetch(key.clone(), || async { Err(Error::Storage("down".to_string())) })
            .await;
        assert!(failed.is_error());
        assert!(cache.snapshot::<u32>(&key).await.is_error());

        let recovered = cache.fetch(key.clone(), || async { Ok(9u32) }).await;
        assert_eq!(recovered.data(), Some(&9));
        assert!(cache.snapshot::<u32>(&key).await.is_success());
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload_and_keeps_stale_data() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);
        let blogs = QueryKey::blogs();
        let other = QueryKey::new(["other"]);

        cache.fetch(blogs.clone(), || counted(&calls, 1)).await;
        cache.fetch(other.clone(), || counted(&calls, 1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(cache.invalidate(&blogs).await, 1);
        assert!(cache.is_stale(&blogs).await);
        assert!(!cache.is_stale(&other).await);

        // Stale data stays visible until the reload lands.
        assert!(matches!(
            cache.snapshot::<u32>(&blogs).await,
            QueryState::Pending { previous: Some(1) }
        ));

        let reloaded = cache.fetch(blogs.clone(), || counted(&calls, 2)).await;
        assert_eq!(reloaded.data(), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!cache.is_stale(&blogs).await);

        cache.fetch(other.clone(), || counted(&calls, 1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalidate_during_load_discards_result() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::blogs();

        let slow = async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(1u32)
        };
        let (first, marked) = tokio::join!(cache.fetch(key.clone(), || slow), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            cache.invalidate(&key).await
        });

        // The caller that asked still gets its answer, but it is not kept fresh.
        assert_eq!(first.data(), Some(&1));
        assert_eq!(marked, 1);
        assert!(cache.is_stale(&key).await);

        let next = cache.fetch(key.clone(), || counted(&calls, 2)).await;
        assert_eq!(next.data(), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_time_expires_entries() {
        let cache = QueryCache::new(QueryConfig {
            stale_time: Duration::ZERO,
            ..QueryConfig::default()
        });
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(["numbers"]);

        cache.fetch(key.clone(), || counted(&calls, 1)).await;
        cache.fetch(key.clone(), || counted(&calls, 1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_key_is_loading() {
        let cache = QueryCache::default();
        let state = cache.snapshot::<u32>(&QueryKey::blogs()).await;
        assert!(matches!(state, QueryState::Pending { previous: None }));
        assert_eq!(cache.invalidate(&QueryKey::blogs()).await, 0);
    }

    #[tokio::test]
    async fn test_clear_forgets_everything() {
        let cache = QueryCache::default();
        let key = QueryKey::new(["numbers"]);
        cache.fetch(key.clone(), || async { Ok(1u32) }).await;

        cache.clear();
        assert!(matches!(
            cache.snapshot::<u32>(&key).await,
            QueryState::Pending { previous: None }
        ));

        let calls = AtomicUsize::new(0);
        cache.fetch(key.clone(), || counted(&calls, 2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
