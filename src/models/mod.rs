pub mod dto;
pub mod movie;
pub mod search;

pub use dto::{image_url, ImageSize, MovieCard};
pub use movie::{Genre, GenreId, MovieRecord, PagedResult};
pub use search::{SearchFilters, SortOption};
