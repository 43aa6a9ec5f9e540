use std::sync::Arc;

use super::pagination::{PaginationLayout, PaginationMode};
use super::params::{UrlParams, GENRE_PARAM, PAGE_PARAM};
use super::sort::SortedMovies;
use super::view::{ContentView, GenreButton, PageView, SortChoice};
use super::viewport::ViewportListener;
use crate::external::{FetchKey, QueryState};
use crate::models::{Genre, GenreId, MovieCard, PagedResult, SearchFilters, SortOption};

/// 电影列表页状态
///
/// URL 参数是唯一的数据来源：页码、关键词、类型都从 URL 派生，
/// 本地只保存排序方式和跟随 URL 同步的页码。
pub struct MoviePage {
    params: UrlParams,
    page: u32,
    /// 上一次观察到的 URL 页码，用于变化检测
    observed_url_page: u32,
    sort_option: SortOption,
    query: QueryState<Arc<PagedResult>>,
    sorted: SortedMovies,
    genres: Vec<Genre>,
    viewport: ViewportListener,
    image_base: String,
}

impl MoviePage {
    pub fn new(params: UrlParams, viewport: ViewportListener) -> Self {
        let page = params.page();
        Self {
            params,
            page,
            observed_url_page: page,
            sort_option: SortOption::default(),
            query: QueryState::Idle,
            sorted: SortedMovies::new(),
            genres: Vec::new(),
            viewport,
            image_base: String::new(),
        }
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    pub fn params(&self) -> &UrlParams {
        &self.params
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn keyword(&self) -> Option<String> {
        self.params.keyword()
    }

    pub fn genre(&self) -> Option<GenreId> {
        self.params.genre()
    }

    pub fn sort_option(&self) -> &SortOption {
        &self.sort_option
    }

    pub fn query_state(&self) -> &QueryState<Arc<PagedResult>> {
        &self.query
    }

    /// 当前的查询条件
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            keyword: self.keyword(),
            genre: self.genre(),
            page: self.page,
            sort_option: self.sort_option.clone(),
        }
    }

    pub fn fetch_key(&self) -> FetchKey {
        FetchKey::from_filters(&self.filters())
    }

    /// URL 从外部变化（前进/后退、直接输入）
    ///
    /// 返回本地页码是否因此被同步。
    pub fn navigate(&mut self, params: UrlParams) -> bool {
        let previous_key = self.fetch_key();
        self.params = params;
        let synced = self.sync_page_from_url();
        self.reset_query_if_key_changed(&previous_key);
        synced
    }

    /// URL 页码 -> 本地页码，只在 URL 页码真正变化时生效
    fn sync_page_from_url(&mut self) -> bool {
        let url_page = self.params.page();
        if url_page == self.observed_url_page {
            return false;
        }
        tracing::debug!("URL page changed {} -> {}", self.observed_url_page, url_page);
        self.observed_url_page = url_page;
        self.page = url_page;
        true
    }

    /// 分页控件点击：`selected` 从 0 开始
    ///
    /// 只合并页码参数，关键词和类型等其他参数保持不变。
    pub fn handle_page_click(&mut self, selected: u32) {
        let previous_key = self.fetch_key();
        let new_page = selected.saturating_add(1);
        self.page = new_page;
        self.params.set(PAGE_PARAM, new_page.to_string());
        self.sync_page_from_url();
        self.reset_query_if_key_changed(&previous_key);
    }

    /// 选择类型：替换 URL 参数为该类型的第一页，并恢复默认排序
    pub fn select_genre(&mut self, genre: GenreId) {
        let previous_key = self.fetch_key();
        self.params = [
            (GENRE_PARAM, genre.to_string()),
            (PAGE_PARAM, "1".to_string()),
        ]
        .into_iter()
        .collect();
        self.page = 1;
        self.sync_page_from_url();
        self.reset_query_if_key_changed(&previous_key);
        self.set_sort_option(SortOption::default());
    }

    /// 修改排序方式：不影响 URL 和页码
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.sort_option = option;
        self.sorted.update(self.query.data(), &self.sort_option);
    }

    pub fn set_genres(&mut self, genres: &[Genre]) {
        self.genres = genres.to_vec();
    }

    /// 接收查询状态；不是当前查询键的结果会被忽略
    pub fn receive(&mut self, key: &FetchKey, state: QueryState<Arc<PagedResult>>) -> bool {
        let current = self.fetch_key();
        if *key != current {
            tracing::debug!("Ignoring stale result for {} (current {})", key, current);
            return false;
        }
        self.query = state;
        self.sorted.update(self.query.data(), &self.sort_option);
        true
    }

    /// 实际执行排序的次数
    pub fn sort_runs(&self) -> u64 {
        self.sorted.sort_runs()
    }

    pub fn pagination_mode(&self) -> PaginationMode {
        PaginationMode::for_mobile(self.viewport.is_mobile())
    }

    /// 生成视图模型；分页模式按当前视口宽度计算
    pub fn view(&self) -> PageView {
        let keyword = self.keyword();
        let (content, pagination) = match &self.query {
            QueryState::Idle | QueryState::Loading => (ContentView::Loading, None),
            QueryState::Failed(cause) => (ContentView::error(cause), None),
            QueryState::Ready(data) if data.results.is_empty() => {
                (ContentView::empty(keyword.as_deref()), None)
            }
            QueryState::Ready(data) => {
                let movies = self
                    .sorted
                    .movies()
                    .iter()
                    .map(|movie| MovieCard::from_record(movie, &self.image_base))
                    .collect();
                let layout = PaginationLayout::new(data.total_pages, self.page, self.pagination_mode());
                (ContentView::Movies { movies }, Some(layout))
            }
        };

        PageView {
            filters: self.filters(),
            query: self.params.to_query_string(),
            sort_options: SortChoice::all(&self.sort_option),
            genres: GenreButton::all(&self.genres, self.genre()),
            content,
            pagination,
        }
    }

    fn reset_query_if_key_changed(&mut self, previous: &FetchKey) {
        if self.fetch_key() != *previous {
            self.query = QueryState::Idle;
        }
    }
}
