// 影片目录 API 错误类型定义

use thiserror::Error;

/// 目录请求的统一错误类型
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("TMDB API key not configured")]
    NotConfigured,

    #[error("Request failed with status code {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

// 实现从 reqwest::Error 到 CatalogError 的转换
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            }
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}
