use axum::{
    extract::{Path, Query, RawQuery, State},
    response::{IntoResponse, Redirect},
};
use std::collections::HashMap;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::response::success;
use crate::external::QueryState;
use crate::models::{GenreId, SortOption};
use crate::page::viewport::DEFAULT_MOBILE_BREAKPOINT;
use crate::page::{MoviePage, UrlParams, ViewportListener};

/// 页面路径
pub const MOVIES_PATH: &str = "/api/movies";

/// 客户端上报的排序方式（不属于筛选条件）
pub const SORT_PARAM: &str = "sort";
/// 客户端上报的视口宽度
pub const WIDTH_PARAM: &str = "width";
/// `wait=false` 时不等待远程请求
pub const WAIT_PARAM: &str = "wait";
/// 分页控件回传的页码（从 0 开始）
pub const SELECTED_PARAM: &str = "selected";

/// 未上报宽度时按桌面端处理
const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

fn movies_location(params: &UrlParams) -> String {
    if params.is_empty() {
        MOVIES_PATH.to_string()
    } else {
        format!("{}?{}", MOVIES_PATH, params.to_query_string())
    }
}

/// 获取类型列表
pub async fn get_genres(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let genres = state.external_client.genres().await?;

    Ok(success(genres.as_ref().clone()))
}

/// 获取热门电影
pub async fn get_popular_movies(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let page = params.get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let result = state.external_client.popular(page).await?;

    Ok(success(result.as_ref().clone()))
}

/// 电影列表页
///
/// 查询失败不作为 HTTP 错误返回，而是渲染到视图中。
pub async fn get_movie_page(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let params = UrlParams::parse(raw.as_deref().unwrap_or(""));

    let width = params.get(WIDTH_PARAM)
        .and_then(|w| w.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    let wait = !matches!(params.get(WAIT_PARAM), Some("false") | Some("0"));
    let sort = params.get(SORT_PARAM).map(SortOption::from).unwrap_or_default();

    let viewport = ViewportListener::fixed(width, state.config.layout.mobile_breakpoint);
    let mut page = MoviePage::new(params, viewport)
        .with_image_base(state.config.tmdb.image_base_url.clone());
    page.set_sort_option(sort);

    let filters = page.filters();
    let key = page.fetch_key();
    let query_state = if wait {
        QueryState::from_result(state.external_client.search(&filters).await)
    } else {
        state.external_client.peek_or_prefetch(&filters).await
    };
    if let QueryState::Failed(ref cause) = query_state {
        tracing::warn!("Movie query {} failed: {}", key, cause);
    }
    page.receive(&key, query_state);

    if wait {
        match state.external_client.genres().await {
            Ok(genres) => page.set_genres(&genres),
            Err(e) => tracing::warn!("Failed to load genres: {}", e),
        }
    } else if let Some(genres) = state.external_client.genres_or_prefetch().await {
        page.set_genres(&genres);
    }

    success(page.view())
}

/// 分页点击：把 `selected`（从 0 开始）换算为页码并合并进 URL
pub async fn page_click(
    RawQuery(raw): RawQuery,
) -> ApiResult<Redirect> {
    let mut params = UrlParams::parse(raw.as_deref().unwrap_or(""));
    let selected = params.get(SELECTED_PARAM)
        .ok_or_else(|| crate::api_error!(BadRequest, "selected is required"))?
        .trim()
        .parse::<u32>()
        .map_err(|_| crate::api_error!(BadRequest, "selected must be a non-negative integer"))?;
    params.remove(SELECTED_PARAM);

    let mut page = MoviePage::new(params, fixed_viewport());
    page.handle_page_click(selected);

    Ok(Redirect::to(&movies_location(page.params())))
}

/// 选择类型：跳转到该类型的第一页
///
/// 筛选参数全部替换；客户端上报的 `width` 保留，分页模式不变。
pub async fn select_genre(
    Path(genre_id): Path<GenreId>,
    RawQuery(raw): RawQuery,
) -> Redirect {
    let params = UrlParams::parse(raw.as_deref().unwrap_or(""));
    let width = params.get(WIDTH_PARAM).map(str::to_string);
    let mut page = MoviePage::new(params, fixed_viewport());
    page.select_genre(genre_id);

    let mut location = page.params().clone();
    if let Some(width) = width {
        location.set(WIDTH_PARAM, width);
    }
    Redirect::to(&movies_location(&location))
}

/// 跳转类接口不渲染分页，宽度无关
fn fixed_viewport() -> ViewportListener {
    ViewportListener::fixed(DEFAULT_VIEWPORT_WIDTH, DEFAULT_MOBILE_BREAKPOINT)
}
