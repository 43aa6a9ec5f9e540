use serde::{Deserialize, Serialize};

use super::{GenreId, MovieRecord};

/// 电影卡片DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genre_ids: Vec<GenreId>,
    pub popularity: f64,
    pub vote_average: f64,
    pub adult: bool,

    // 计算字段
    pub year_string: String,
    pub rating_string: String,
}

impl MovieCard {
    /// `image_base` 形如 `https://image.tmdb.org/t/p`
    pub fn from_record(movie: &MovieRecord, image_base: &str) -> Self {
        Self {
            year_string: movie.year_string(),
            rating_string: movie.rating_string(),
            poster_url: movie
                .poster_path
                .as_deref()
                .map(|path| image_url(image_base, ImageSize::W500, path)),
            backdrop_url: movie
                .backdrop_path
                .as_deref()
                .map(|path| image_url(image_base, ImageSize::W780, path)),
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            genre_ids: movie.genre_ids.clone(),
            popularity: movie.popularity,
            vote_average: movie.vote_average,
            adult: movie.adult,
        }
    }
}

/// 图片尺寸枚举
#[derive(Debug, Clone, Copy)]
pub enum ImageSize {
    W500,
    W780,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
        }
    }
}

/// 构建图片URL
pub fn image_url(image_base: &str, size: ImageSize, path: &str) -> String {
    format!("{}/{}{}", image_base.trim_end_matches('/'), size.as_str(), path)
}
