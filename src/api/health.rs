use axum::{
    extract::State,
    response::IntoResponse,
};
use serde_json::json;

use super::AppState;
use super::response::{success, success_message};

/// 健康检查端点
pub async fn health_check(
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tmdb_status = if state.external_client.is_catalog_available() {
        "available"
    } else {
        "not_configured"
    };

    success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "tmdb_api": tmdb_status
    }))
}

/// 获取缓存统计信息
pub async fn get_cache_stats(
    State(state): State<AppState>,
) -> impl IntoResponse {
    let stats = state.external_client.cache.stats().await;

    success(json!({
        "query_cache": stats,
        "ttl_secs": state.config.cache.ttl_secs,
        "max_capacity": state.config.cache.max_capacity,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 清空所有缓存
pub async fn clear_cache(
    State(state): State<AppState>,
) -> impl IntoResponse {
    state.external_client.cache.clear().await;
    tracing::info!("Query cache cleared");

    success_message("All caches cleared")
}
