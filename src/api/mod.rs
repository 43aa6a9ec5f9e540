pub mod error;
pub mod health;
pub mod movies;
pub mod response;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::external::ExternalApiClient;

#[derive(Clone)]
pub struct AppState {
    pub external_client: ExternalApiClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(external_client: ExternalApiClient, config: AppConfig) -> Self {
        Self {
            external_client,
            config: Arc::new(config),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Movie Discovery API v1.0" }))
        // Health and cache
        .route("/api/health", get(health::health_check))
        .route("/api/cache/stats", get(health::get_cache_stats))
        .route("/api/cache/clear", post(health::clear_cache))
        // Catalog
        .route("/api/genres", get(movies::get_genres))
        .route("/api/movies/popular", get(movies::get_popular_movies))
        // Movie page
        .route("/api/movies", get(movies::get_movie_page))
        .route("/api/movies/page-click", get(movies::page_click))
        .route("/api/movies/genre/:genre_id", get(movies::select_genre))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
