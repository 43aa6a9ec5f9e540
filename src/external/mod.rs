pub mod cache;
pub mod error;
pub mod tmdb;

use async_trait::async_trait;
use std::sync::Arc;

pub use cache::{CacheMaintenanceTask, CacheStats, Endpoint, FetchKey, QueryCache, QueryState};
pub use error::CatalogError;
pub use tmdb::TmdbClient;

use crate::config::AppConfig;
use crate::models::{Genre, PagedResult, SearchFilters};

/// 远程影片目录
///
/// 核心逻辑只依赖返回的数据结构，测试中可替换为内存实现。
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_popular(&self, page: u32) -> Result<PagedResult, CatalogError>;

    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    async fn fetch_search(&self, filters: &SearchFilters) -> Result<PagedResult, CatalogError>;
}

/// 带缓存的目录客户端
#[derive(Clone)]
pub struct ExternalApiClient {
    catalog: Option<Arc<dyn CatalogClient>>,
    pub cache: QueryCache,
}

impl ExternalApiClient {
    pub fn new(catalog: Option<Arc<dyn CatalogClient>>, cache: QueryCache) -> Self {
        Self { catalog, cache }
    }

    /// 按配置创建 TMDB 客户端；未配置 API key 时目录不可用
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = match config.tmdb.api_key.clone() {
            Some(api_key) => {
                let client = TmdbClient::new(api_key, &config.tmdb)?;
                Some(Arc::new(client) as Arc<dyn CatalogClient>)
            }
            None => {
                tracing::warn!("TMDB_API_KEY not set, catalog requests will fail");
                None
            }
        };

        Ok(Self::new(catalog, QueryCache::new(&config.cache)))
    }

    fn catalog(&self) -> Result<Arc<dyn CatalogClient>, Arc<CatalogError>> {
        self.catalog
            .clone()
            .ok_or_else(|| Arc::new(CatalogError::NotConfigured))
    }

    /// 按筛选条件查询（带缓存）
    pub async fn search(&self, filters: &SearchFilters) -> Result<Arc<PagedResult>, Arc<CatalogError>> {
        let catalog = self.catalog()?;
        let key = FetchKey::from_filters(filters);
        self.cache
            .get_or_fetch(&key, async move { catalog.fetch_search(filters).await })
            .await
    }

    /// 获取热门电影（带缓存）
    pub async fn popular(&self, page: u32) -> Result<Arc<PagedResult>, Arc<CatalogError>> {
        let catalog = self.catalog()?;
        self.cache
            .get_or_fetch(&FetchKey::popular(page), async move { catalog.fetch_popular(page).await })
            .await
    }

    /// 获取类型列表（带缓存）
    pub async fn genres(&self) -> Result<Arc<Vec<Genre>>, Arc<CatalogError>> {
        let catalog = self.catalog()?;
        self.cache
            .get_or_fetch_genres(async move { catalog.fetch_genres().await })
            .await
    }

    /// 查看查询状态；未命中时在后台发起请求
    pub async fn peek_or_prefetch(&self, filters: &SearchFilters) -> QueryState<Arc<PagedResult>> {
        let key = FetchKey::from_filters(filters);
        match self.cache.peek(&key).await {
            QueryState::Idle => {
                if self.catalog.is_none() {
                    return QueryState::Failed(CatalogError::NotConfigured.to_string());
                }
                let client = self.clone();
                let filters = filters.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.search(&filters).await {
                        tracing::warn!("Prefetch failed for {}: {}", FetchKey::from_filters(&filters), e);
                    }
                });
                QueryState::Loading
            }
            state => state,
        }
    }

    /// 已缓存的类型列表；未缓存时在后台加载并返回 `None`
    pub async fn genres_or_prefetch(&self) -> Option<Arc<Vec<Genre>>> {
        if let Some(genres) = self.cache.peek_genres().await {
            return Some(genres);
        }
        if self.catalog.is_some() {
            let client = self.clone();
            tokio::spawn(async move {
                if let Err(e) = client.genres().await {
                    tracing::warn!("Genre prefetch failed: {}", e);
                }
            });
        }
        None
    }

    /// 检查目录客户端是否可用
    pub fn is_catalog_available(&self) -> bool {
        self.catalog.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogClient for CountingCatalog {
        async fn fetch_popular(&self, page: u32) -> Result<PagedResult, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PagedResult::empty(page))
        }

        async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Genre { id: 18, name: "Drama".to_string() }])
        }

        async fn fetch_search(&self, filters: &SearchFilters) -> Result<PagedResult, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PagedResult::empty(filters.page))
        }
    }

    fn client() -> (ExternalApiClient, Arc<CountingCatalog>) {
        let catalog = Arc::new(CountingCatalog { calls: AtomicUsize::new(0) });
        let cache = QueryCache::new(&CacheSettings::default());
        (ExternalApiClient::new(Some(catalog.clone()), cache), catalog)
    }

    #[tokio::test]
    async fn test_search_is_cached_across_sort_options() {
        let (client, catalog) = client();
        let mut filters = SearchFilters {
            keyword: Some("dune".to_string()),
            ..SearchFilters::default()
        };

        client.search(&filters).await.unwrap();
        filters.sort_option = crate::models::SortOption::VoteAverageDesc;
        client.search(&filters).await.unwrap();

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_genres_cached() {
        let (client, catalog) = client();
        let first = client.genres().await.unwrap();
        let second = client.genres().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_genres_or_prefetch_does_not_wait() {
        let (client, catalog) = client();
        assert!(client.genres_or_prefetch().await.is_none());

        for _ in 0..100 {
            if client.cache.peek_genres().await.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let genres = client.genres_or_prefetch().await.unwrap();
        assert_eq!(genres[0].name, "Drama");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_configured() {
        let client = ExternalApiClient::new(None, QueryCache::new(&CacheSettings::default()));
        assert!(!client.is_catalog_available());
        let err = client.popular(1).await.unwrap_err();
        assert_eq!(err.as_ref(), &CatalogError::NotConfigured);

        let state = client.peek_or_prefetch(&SearchFilters::default()).await;
        assert_eq!(state, QueryState::Failed("TMDB API key not configured".to_string()));
        assert!(client.genres_or_prefetch().await.is_none());
    }
}
