use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::CatalogError;
use super::CatalogClient;
use crate::config::TmdbConfig;
use crate::models::{Genre, PagedResult, SearchFilters};

/// TMDB API客户端
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, config: &TmdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// 发送 GET 请求，附带 api_key 和 language
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Response, CatalogError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // TMDB 的错误响应体带有 status_message
            let message = response
                .json::<TmdbErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.status_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            tracing::warn!("TMDB API error on {}: {} {}", path, status, message);
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// 获取热门电影
    pub async fn get_popular_movies(&self, page: u32) -> Result<PagedResult, CatalogError> {
        let response = self.get("/movie/popular", &[("page", page.to_string())]).await?;
        Ok(response.json().await?)
    }

    /// 搜索电影
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<PagedResult, CatalogError> {
        let response = self
            .get(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(response.json().await?)
    }

    /// 按类型浏览电影
    pub async fn discover_by_genre(&self, genre: u32, page: u32) -> Result<PagedResult, CatalogError> {
        let response = self
            .get(
                "/discover/movie",
                &[
                    ("with_genres", genre.to_string()),
                    ("page", page.to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                ],
            )
            .await?;
        Ok(response.json().await?)
    }

    /// 获取电影类型列表
    pub async fn get_movie_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let response = self.get("/genre/movie/list", &[]).await?;
        let body: TmdbGenreListResponse = response.json().await?;
        Ok(body.genres)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch_popular(&self, page: u32) -> Result<PagedResult, CatalogError> {
        self.get_popular_movies(page).await
    }

    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.get_movie_genres().await
    }

    async fn fetch_search(&self, filters: &SearchFilters) -> Result<PagedResult, CatalogError> {
        match (filters.keyword.as_deref(), filters.genre) {
            (Some(keyword), genre) => {
                let mut result = self.search_movies(keyword, filters.page).await?;
                // 搜索接口不支持类型过滤，只能在当前页内过滤
                if let Some(genre) = genre {
                    result.results.retain(|movie| movie.has_genre(genre));
                }
                Ok(result)
            }
            (None, Some(genre)) => self.discover_by_genre(genre, filters.page).await,
            (None, None) => self.get_popular_movies(filters.page).await,
        }
    }
}

/// TMDB类型列表响应
#[derive(Debug, Deserialize, Serialize)]
pub struct TmdbGenreListResponse {
    pub genres: Vec<Genre>,
}

/// TMDB错误响应
#[derive(Debug, Deserialize)]
struct TmdbErrorResponse {
    status_message: Option<String>,
}
