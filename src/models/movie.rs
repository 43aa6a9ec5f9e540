use serde::{Deserialize, Serialize};

/// 类型ID（TMDB genre id）
pub type GenreId = u32;

/// 电影记录
///
/// 排序只关心 `popularity` 和 `vote_average`，其余字段原样透传给展示层。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub adult: bool,
}

impl MovieRecord {
    /// 从发行日期中取年份
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
    }

    pub fn year_string(&self) -> String {
        self.year().map(|y| y.to_string()).unwrap_or_default()
    }

    pub fn rating_string(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genre_ids.contains(&genre)
    }
}

/// 一页查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl PagedResult {
    pub fn new(page: u32, results: Vec<MovieRecord>, total_pages: u32) -> Self {
        let total_results = results.len() as u32;
        Self {
            page,
            results,
            total_pages,
            total_results,
        }
    }

    pub fn empty(page: u32) -> Self {
        Self::new(page, Vec::new(), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 电影类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tmdb_movie_with_missing_fields() {
        let json = r#"{
            "id": 268,
            "title": "Batman",
            "release_date": "1989-06-21",
            "popularity": 45.2,
            "vote_average": 7.2,
            "genre_ids": [14, 28]
        }"#;

        let movie: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 268);
        assert_eq!(movie.year(), Some(1989));
        assert_eq!(movie.rating_string(), "7.2");
        assert!(movie.has_genre(28));
        assert!(movie.poster_path.is_none());
        assert_eq!(movie.vote_count, 0);
    }

    #[test]
    fn test_deserialize_paged_result_defaults() {
        let json = r#"{ "results": [] }"#;
        let result: PagedResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.page, 1);
        assert_eq!(result.total_pages, 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_year_with_bad_date() {
        let mut movie: MovieRecord = serde_json::from_str(r#"{"id": 1, "title": "x"}"#).unwrap();
        assert_eq!(movie.year_string(), "");

        movie.release_date = Some("unknown".to_string());
        assert_eq!(movie.year(), None);
    }
}
