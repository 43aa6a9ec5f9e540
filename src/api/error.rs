use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

use crate::external::CatalogError;

/// 统一的API错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 请求参数错误
    BadRequest(String),
    /// 外部服务错误
    ExternalService(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ExternalService(msg) => write!(f, "External service error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// 从目录错误转换
impl From<Arc<CatalogError>> for ApiError {
    fn from(err: Arc<CatalogError>) -> Self {
        match err.as_ref() {
            CatalogError::NotConfigured => {
                ApiError::ExternalService("TMDB service unavailable: API key not configured".to_string())
            }
            other => ApiError::ExternalService(format!("TMDB request failed: {}", other)),
        }
    }
}

/// 实现IntoResponse，将错误转换为HTTP响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            ApiError::ExternalService(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "external_service_error",
                    msg.clone(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 辅助宏：快速创建错误
#[macro_export]
macro_rules! api_error {
    (BadRequest, $msg:expr) => {
        $crate::api::error::ApiError::BadRequest($msg.to_string())
    };
}
