// 电影列表页核心逻辑
//
// - URL 参数解析与合并
// - 页码同步、类型选择、分页点击
// - 客户端排序
// - 响应式分页布局
// - 视图模型

pub mod pagination;
pub mod params;
pub mod sort;
pub mod state;
pub mod view;
pub mod viewport;

pub use pagination::{PageItem, PaginationLayout, PaginationMode};
pub use params::UrlParams;
pub use sort::{sort_movies, SortedMovies};
pub use state::MoviePage;
pub use view::{ContentView, GenreButton, PageView, SortChoice};
pub use viewport::{Viewport, ViewportListener};
