use serde::Serialize;

use super::pagination::PaginationLayout;
use crate::models::{Genre, GenreId, MovieCard, SearchFilters, SortOption};

/// 页面视图模型
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub filters: SearchFilters,
    /// 当前页面的查询字符串
    pub query: String,
    pub sort_options: Vec<SortChoice>,
    pub genres: Vec<GenreButton>,
    pub content: ContentView,
    /// 只有在有结果时显示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationLayout>,
}

/// 主体内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentView {
    Loading,
    Error { message: String },
    Empty { message: String },
    Movies { movies: Vec<MovieCard> },
}

impl ContentView {
    pub fn error(cause: &str) -> Self {
        ContentView::Error {
            message: format!("Error fetching movies: {}", cause),
        }
    }

    /// 有关键词时提示关键词，否则使用通用提示
    pub fn empty(keyword: Option<&str>) -> Self {
        let message = match keyword {
            Some(keyword) => format!("No results found for \"{}\".", keyword),
            None => "No movies found.".to_string(),
        };
        ContentView::Empty { message }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ContentView::Error { message } | ContentView::Empty { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// 排序下拉框选项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SortChoice {
    pub fn all(current: &SortOption) -> Vec<SortChoice> {
        SortOption::CHOICES
            .iter()
            .map(|option| SortChoice {
                value: option.as_str().to_string(),
                label: option.label().to_string(),
                selected: option == current,
            })
            .collect()
    }
}

/// 类型按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreButton {
    pub id: GenreId,
    pub name: String,
    pub active: bool,
}

impl GenreButton {
    pub fn all(genres: &[Genre], current: Option<GenreId>) -> Vec<GenreButton> {
        genres
            .iter()
            .map(|genre| GenreButton {
                id: genre.id,
                name: genre.name.clone(),
                active: current == Some(genre.id),
            })
            .collect()
    }
}
