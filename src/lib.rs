// 电影发现后端库
//
// 本库提供电影浏览页的核心功能，包括：
// - API 路由
// - 外部影片目录集成与查询缓存
// - 页面状态派生、排序与分页
// - 运行配置

pub mod api;
pub mod config;
pub mod external;
pub mod models;
pub mod page;
