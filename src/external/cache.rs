use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::CatalogError;
use crate::config::CacheSettings;
use crate::models::{Genre, GenreId, PagedResult, SearchFilters};

/// 查询对应的远程接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Popular,
    Search,
    Discover,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Popular => "popular",
            Endpoint::Search => "search",
            Endpoint::Discover => "discover",
        }
    }
}

/// 缓存键：接口 + 关键词 + 类型 + 页码
///
/// 排序方式不属于缓存键，同一页的不同排序共用一次请求。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub endpoint: Endpoint,
    pub keyword: Option<String>,
    pub genre: Option<GenreId>,
    pub page: u32,
}

impl FetchKey {
    pub fn popular(page: u32) -> Self {
        Self {
            endpoint: Endpoint::Popular,
            keyword: None,
            genre: None,
            page,
        }
    }

    pub fn from_filters(filters: &SearchFilters) -> Self {
        let endpoint = match (&filters.keyword, filters.genre) {
            (Some(_), _) => Endpoint::Search,
            (None, Some(_)) => Endpoint::Discover,
            (None, None) => Endpoint::Popular,
        };

        Self {
            endpoint,
            keyword: filters.keyword.clone(),
            genre: filters.genre,
            page: filters.page,
        }
    }
}

impl std::fmt::Display for FetchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.endpoint.as_str(),
            self.keyword.as_deref().unwrap_or(""),
            self.genre.map(|g| g.to_string()).unwrap_or_default(),
            self.page
        )
    }
}

/// 查询状态
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// 尚未发起请求
    Idle,
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => QueryState::Ready(data),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

const GENRES_KEY: &str = "genres";

/// 远程查询缓存
///
/// 同一个键的并发请求只会真正执行一次，所有调用方拿到同一个 `Arc` 结果。
/// 失败的请求不会被缓存；失败信息只短暂保留，供 `peek` 报告。
#[derive(Clone)]
pub struct QueryCache {
    movies: Cache<FetchKey, Arc<PagedResult>>,
    genres: Cache<&'static str, Arc<Vec<Genre>>>,
    failures: Cache<FetchKey, String>,
    in_flight: Arc<Mutex<HashSet<FetchKey>>>,
}

impl QueryCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let ttl = Duration::from_secs(settings.ttl_secs);
        Self {
            movies: Cache::builder()
                .max_capacity(settings.max_capacity)
                .time_to_live(ttl)
                .build(),
            // 类型列表几乎不变，缓存时间放宽到4倍
            genres: Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl * 4)
                .build(),
            failures: Cache::builder()
                .max_capacity(settings.max_capacity)
                .time_to_live(Duration::from_secs(settings.failure_ttl_secs))
                .build(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// 命中缓存直接返回，否则执行 `fetch` 并写入缓存
    pub async fn get_or_fetch<F>(
        &self,
        key: &FetchKey,
        fetch: F,
    ) -> Result<Arc<PagedResult>, Arc<CatalogError>>
    where
        F: Future<Output = Result<PagedResult, CatalogError>>,
    {
        if let Some(hit) = self.movies.get(key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let in_flight = self.in_flight.clone();
        let failures = self.failures.clone();
        let flight_key = key.clone();
        self.movies
            .try_get_with(key.clone(), async move {
                let guard = InFlightGuard::register(in_flight, flight_key);
                tracing::debug!("Cache miss for {}, fetching", guard.key);
                // 失败信息在注销 in-flight 之前写入
                match fetch.await {
                    Ok(result) => {
                        failures.invalidate(&guard.key).await;
                        Ok(Arc::new(result))
                    }
                    Err(e) => {
                        failures.insert(guard.key.clone(), e.to_string()).await;
                        Err(e)
                    }
                }
            })
            .await
    }

    /// 类型列表缓存
    pub async fn get_or_fetch_genres<F>(&self, fetch: F) -> Result<Arc<Vec<Genre>>, Arc<CatalogError>>
    where
        F: Future<Output = Result<Vec<Genre>, CatalogError>>,
    {
        self.genres
            .try_get_with(GENRES_KEY, async move { fetch.await.map(Arc::new) })
            .await
    }

    /// 查看某个键的当前状态，不触发请求
    pub async fn peek(&self, key: &FetchKey) -> QueryState<Arc<PagedResult>> {
        if let Some(hit) = self.movies.get(key).await {
            return QueryState::Ready(hit);
        }
        if self.is_in_flight(key) {
            return QueryState::Loading;
        }
        match self.failures.get(key).await {
            Some(message) => QueryState::Failed(message),
            None => QueryState::Idle,
        }
    }

    /// 已缓存的类型列表，不触发请求
    pub async fn peek_genres(&self) -> Option<Arc<Vec<Genre>>> {
        self.genres.get(GENRES_KEY).await
    }

    pub fn is_in_flight(&self, key: &FetchKey) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(key))
            .unwrap_or(false)
    }

    /// 执行挂起的过期/淘汰任务
    pub async fn run_pending_tasks(&self) {
        self.movies.run_pending_tasks().await;
        self.genres.run_pending_tasks().await;
        self.failures.run_pending_tasks().await;
    }

    /// 清空所有缓存
    pub async fn clear(&self) {
        self.movies.invalidate_all();
        self.genres.invalidate_all();
        self.failures.invalidate_all();
        self.run_pending_tasks().await;
    }

    /// 获取缓存统计信息
    pub async fn stats(&self) -> CacheStats {
        self.run_pending_tasks().await;
        CacheStats {
            movie_cache_size: self.movies.entry_count(),
            genre_cache_size: self.genres.entry_count(),
            recent_failures: self.failures.entry_count(),
            in_flight: self.in_flight.lock().map(|set| set.len()).unwrap_or(0),
        }
    }
}

/// 请求进行期间登记在 `in_flight` 中，结束（包括被取消）时移除
struct InFlightGuard {
    set: Arc<Mutex<HashSet<FetchKey>>>,
    key: FetchKey,
}

impl InFlightGuard {
    fn register(set: Arc<Mutex<HashSet<FetchKey>>>, key: FetchKey) -> Self {
        if let Ok(mut guard) = set.lock() {
            guard.insert(key.clone());
        }
        Self { set, key }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.set.lock() {
            guard.remove(&self.key);
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub movie_cache_size: u64,
    pub genre_cache_size: u64,
    pub recent_failures: u64,
    pub in_flight: usize,
}

/// 缓存维护任务
pub struct CacheMaintenanceTask {
    cache: QueryCache,
    interval: Duration,
}

impl CacheMaintenanceTask {
    pub fn new(cache: QueryCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// 启动定期维护任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            let stats = self.cache.stats().await;
            tracing::debug!("Cache maintenance completed. Stats: {:?}", stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn settings() -> CacheSettings {
        CacheSettings {
            ttl_secs: 60,
            max_capacity: 100,
            maintenance_secs: 60,
            failure_ttl_secs: 60,
        }
    }

    fn filters(keyword: Option<&str>, genre: Option<GenreId>, page: u32) -> SearchFilters {
        SearchFilters {
            keyword: keyword.map(str::to_string),
            genre,
            page,
            ..SearchFilters::default()
        }
    }

    #[test]
    fn test_fetch_key_endpoint() {
        assert_eq!(FetchKey::from_filters(&filters(None, None, 1)).endpoint, Endpoint::Popular);
        assert_eq!(FetchKey::from_filters(&filters(None, Some(28), 1)).endpoint, Endpoint::Discover);
        assert_eq!(FetchKey::from_filters(&filters(Some("batman"), Some(28), 2)).endpoint, Endpoint::Search);
        assert_eq!(
            FetchKey::from_filters(&filters(Some("batman"), Some(28), 2)).to_string(),
            "search:batman:28:2"
        );
    }

    #[test]
    fn test_fetch_key_ignores_sort() {
        let mut a = filters(Some("alien"), None, 1);
        let b = a.clone();
        a.sort_option = crate::models::SortOption::VoteAverageAsc;
        assert_eq!(FetchKey::from_filters(&a), FetchKey::from_filters(&b));
    }

    #[tokio::test]
    async fn test_concurrent_requests_fetch_once() {
        let cache = QueryCache::new(&settings());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = FetchKey::popular(1);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(&key, async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(PagedResult::empty(1))
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = QueryCache::new(&settings());
        let key = FetchKey::popular(2);

        let first = cache
            .get_or_fetch(&key, async { Err(CatalogError::Timeout) })
            .await;
        assert_eq!(first.unwrap_err().as_ref(), &CatalogError::Timeout);
        // 失败信息可被查看，但不会阻止下一次请求
        assert_eq!(
            cache.peek(&key).await,
            QueryState::Failed("Request timed out".to_string())
        );

        let second = cache
            .get_or_fetch(&key, async { Ok(PagedResult::empty(2)) })
            .await;
        assert!(second.is_ok());
        assert!(matches!(cache.peek(&key).await, QueryState::Ready(_)));

        cache.movies.invalidate(&key).await;
        assert_eq!(cache.peek(&key).await, QueryState::Idle);
    }

    #[tokio::test]
    async fn test_failure_expires() {
        let cache = QueryCache::new(&CacheSettings {
            failure_ttl_secs: 1,
            ..settings()
        });
        let key = FetchKey::popular(4);

        let _ = cache
            .get_or_fetch(&key, async { Err(CatalogError::Network("reset".to_string())) })
            .await;
        assert!(matches!(cache.peek(&key).await, QueryState::Failed(_)));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.peek(&key).await, QueryState::Idle);
    }

    #[tokio::test]
    async fn test_peek_reports_loading_while_in_flight() {
        let cache = QueryCache::new(&settings());
        let key = FetchKey::popular(3);
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let background = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&key, async move {
                        let _ = release_rx.await;
                        Ok(PagedResult::empty(3))
                    })
                    .await
            })
        };

        // 等待后台请求登记
        for _ in 0..100 {
            if cache.is_in_flight(&key) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(cache.peek(&key).await, QueryState::Loading);

        release_tx.send(()).unwrap();
        background.await.unwrap().unwrap();
        assert!(!cache.is_in_flight(&key));
        assert!(matches!(cache.peek(&key).await, QueryState::Ready(_)));
    }

    #[tokio::test]
    async fn test_clear_and_stats() {
        let cache = QueryCache::new(&settings());
        cache
            .get_or_fetch(&FetchKey::popular(1), async { Ok(PagedResult::empty(1)) })
            .await
            .unwrap();
        cache
            .get_or_fetch_genres(async { Ok(vec![Genre { id: 28, name: "Action".to_string() }]) })
            .await
            .unwrap();

        let _ = cache
            .get_or_fetch(&FetchKey::popular(2), async { Err(CatalogError::Timeout) })
            .await;

        let stats = cache.stats().await;
        assert_eq!(stats.movie_cache_size, 1);
        assert_eq!(stats.genre_cache_size, 1);
        assert_eq!(stats.recent_failures, 1);
        assert_eq!(stats.in_flight, 0);
        assert_eq!(cache.peek_genres().await.map(|g| g.len()), Some(1));

        cache.clear().await;
        assert_eq!(cache.peek(&FetchKey::popular(1)).await, QueryState::Idle);
        assert_eq!(cache.peek(&FetchKey::popular(2)).await, QueryState::Idle);
        assert!(cache.peek_genres().await.is_none());
    }
}
