use serde::{Deserialize, Serialize};
use super::GenreId;

/// 从 URL 参数派生出的查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub genre: Option<GenreId>,
    pub page: u32,
    pub sort_option: SortOption,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keyword: None,
            genre: None,
            page: 1,
            sort_option: SortOption::default(),
        }
    }
}

/// 排序方式
///
/// 无法识别的值原样保留，排序时保持输入顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOption {
    #[default]
    PopularityDesc,
    PopularityAsc,
    VoteAverageDesc,
    VoteAverageAsc,
    Unrecognized(String),
}

impl SortOption {
    /// 下拉框中可选的排序方式
    pub const CHOICES: [SortOption; 4] = [
        SortOption::PopularityDesc,
        SortOption::PopularityAsc,
        SortOption::VoteAverageDesc,
        SortOption::VoteAverageAsc,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SortOption::PopularityDesc => "popularity.desc",
            SortOption::PopularityAsc => "popularity.asc",
            SortOption::VoteAverageDesc => "vote_average.desc",
            SortOption::VoteAverageAsc => "vote_average.asc",
            SortOption::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SortOption::PopularityDesc => "Popularity (descending)",
            SortOption::PopularityAsc => "Popularity (ascending)",
            SortOption::VoteAverageDesc => "Rating (descending)",
            SortOption::VoteAverageAsc => "Rating (ascending)",
            SortOption::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, SortOption::Unrecognized(_))
    }
}

impl From<&str> for SortOption {
    fn from(value: &str) -> Self {
        match value {
            "popularity.desc" => SortOption::PopularityDesc,
            "popularity.asc" => SortOption::PopularityAsc,
            "vote_average.desc" => SortOption::VoteAverageDesc,
            "vote_average.asc" => SortOption::VoteAverageAsc,
            other => SortOption::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for SortOption {
    fn from(value: String) -> Self {
        SortOption::from(value.as_str())
    }
}

impl From<SortOption> for String {
    fn from(option: SortOption) -> Self {
        option.as_str().to_string()
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
