use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{MovieRecord, PagedResult, SortOption};

/// 按排序方式比较两部电影；无法识别的排序方式返回 `None`
fn compare(a: &MovieRecord, b: &MovieRecord, option: &SortOption) -> Option<Ordering> {
    match option {
        SortOption::PopularityDesc => Some(b.popularity.total_cmp(&a.popularity)),
        SortOption::PopularityAsc => Some(a.popularity.total_cmp(&b.popularity)),
        SortOption::VoteAverageDesc => Some(b.vote_average.total_cmp(&a.vote_average)),
        SortOption::VoteAverageAsc => Some(a.vote_average.total_cmp(&b.vote_average)),
        SortOption::Unrecognized(_) => None,
    }
}

/// 返回排好序的副本，原列表不变
///
/// 稳定排序：键相同的电影保持输入中的相对顺序。
pub fn sort_movies(movies: &[MovieRecord], option: &SortOption) -> Vec<MovieRecord> {
    let mut sorted = movies.to_vec();
    if option.is_recognized() {
        sorted.sort_by(|a, b| compare(a, b, option).unwrap_or(Ordering::Equal));
    }
    sorted
}

/// 排序结果缓存
///
/// 只有查询结果（按 `Arc` 身份）或排序方式变化时才重新排序；
/// 没有数据时不排序。
#[derive(Debug, Default)]
pub struct SortedMovies {
    source: Option<Arc<PagedResult>>,
    option: SortOption,
    movies: Vec<MovieRecord>,
    sort_runs: u64,
}

impl SortedMovies {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回是否重新排序
    pub fn update(&mut self, data: Option<&Arc<PagedResult>>, option: &SortOption) -> bool {
        let Some(data) = data else {
            return false;
        };

        let same_source = self
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, data));
        if same_source && self.option == *option {
            return false;
        }

        self.movies = sort_movies(&data.results, option);
        self.source = Some(Arc::clone(data));
        self.option = option.clone();
        self.sort_runs += 1;
        tracing::debug!(
            "Sorted {} movies by {} (run {})",
            self.movies.len(),
            option,
            self.sort_runs
        );
        true
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn source(&self) -> Option<&Arc<PagedResult>> {
        self.source.as_ref()
    }

    /// 实际执行排序的次数
    pub fn sort_runs(&self) -> u64 {
        self.sort_runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn movie(id: u64, popularity: f64, vote_average: f64) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {}", id),
            original_title: None,
            overview: None,
            release_date: None,
            poster_path: None,
            backdrop_path: None,
            genre_ids: Vec::new(),
            popularity,
            vote_average,
            vote_count: 0,
            adult: false,
        }
    }

    fn movies_from(keys: &[(u8, u8)]) -> Vec<MovieRecord> {
        keys.iter()
            .enumerate()
            .map(|(i, (p, v))| movie(i as u64, *p as f64, *v as f64 / 10.0))
            .collect()
    }

    fn ids(movies: &[MovieRecord]) -> Vec<u64> {
        movies.iter().map(|m| m.id).collect()
    }

    fn key(movie: &MovieRecord, option: &SortOption) -> f64 {
        match option {
            SortOption::PopularityDesc | SortOption::PopularityAsc => movie.popularity,
            _ => movie.vote_average,
        }
    }

    fn any_option() -> impl Strategy<Value = SortOption> {
        prop_oneof![
            Just(SortOption::PopularityDesc),
            Just(SortOption::PopularityAsc),
            Just(SortOption::VoteAverageDesc),
            Just(SortOption::VoteAverageAsc),
            Just(SortOption::Unrecognized("title.asc".to_string())),
        ]
    }

    #[test]
    fn test_sort_each_option() {
        let movies = vec![movie(1, 10.0, 6.5), movie(2, 30.0, 8.1), movie(3, 20.0, 7.0)];

        assert_eq!(ids(&sort_movies(&movies, &SortOption::PopularityDesc)), vec![2, 3, 1]);
        assert_eq!(ids(&sort_movies(&movies, &SortOption::PopularityAsc)), vec![1, 3, 2]);
        assert_eq!(ids(&sort_movies(&movies, &SortOption::VoteAverageDesc)), vec![2, 3, 1]);
        assert_eq!(ids(&sort_movies(&movies, &SortOption::VoteAverageAsc)), vec![1, 3, 2]);
        assert_eq!(
            ids(&sort_movies(&movies, &SortOption::from("release_date.desc"))),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_sort_keeps_input_untouched() {
        let movies = vec![movie(1, 1.0, 1.0), movie(2, 2.0, 2.0)];
        let sorted = sort_movies(&movies, &SortOption::PopularityDesc);
        assert_eq!(ids(&movies), vec![1, 2]);
        assert_eq!(ids(&sorted), vec![2, 1]);
        assert_eq!(sorted[0], movies[1]);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_movies(&[], &SortOption::PopularityDesc).is_empty());
    }

    #[test]
    fn test_memo_skips_without_data() {
        let mut sorted = SortedMovies::new();
        assert!(!sorted.update(None, &SortOption::PopularityDesc));
        assert_eq!(sorted.sort_runs(), 0);
        assert!(sorted.movies().is_empty());
    }

    #[test]
    fn test_memo_resorts_only_on_change() {
        let data = Arc::new(PagedResult::new(
            1,
            vec![movie(1, 5.0, 9.0), movie(2, 50.0, 3.0)],
            1,
        ));
        let mut sorted = SortedMovies::new();

        assert!(sorted.update(Some(&data), &SortOption::PopularityDesc));
        assert!(!sorted.update(Some(&data), &SortOption::PopularityDesc));
        assert_eq!(sorted.sort_runs(), 1);
        assert_eq!(ids(sorted.movies()), vec![2, 1]);

        // 排序方式变化
        assert!(sorted.update(Some(&data), &SortOption::VoteAverageDesc));
        assert_eq!(ids(sorted.movies()), vec![1, 2]);

        // 新的查询结果（内容相同但不是同一个 Arc）
        let refetched = Arc::new((*data).clone());
        assert!(sorted.update(Some(&refetched), &SortOption::VoteAverageDesc));
        assert_eq!(sorted.sort_runs(), 3);
        assert!(Arc::ptr_eq(sorted.source().unwrap(), &refetched));

        // 加载中不影响已有结果
        assert!(!sorted.update(None, &SortOption::PopularityAsc));
        assert_eq!(ids(sorted.movies()), vec![1, 2]);
    }

    proptest! {
        #[test]
        fn prop_sort_is_idempotent(
            keys in prop::collection::vec((0u8..20, 0u8..100), 0..40),
            option in any_option(),
        ) {
            let once = sort_movies(&movies_from(&keys), &option);
            let twice = sort_movies(&once, &option);
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn prop_sort_is_stable(
            keys in prop::collection::vec((0u8..5, 0u8..5), 0..40),
            option in any_option(),
        ) {
            let sorted = sort_movies(&movies_from(&keys), &option);
            for pair in sorted.windows(2) {
                if key(&pair[0], &option) == key(&pair[1], &option) {
                    // 输入顺序即 id 顺序
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }

        #[test]
        fn prop_sort_is_permutation(
            keys in prop::collection::vec((0u8..20, 0u8..100), 0..40),
            option in any_option(),
        ) {
            let movies = movies_from(&keys);
            let mut sorted_ids = ids(&sort_movies(&movies, &option));
            sorted_ids.sort_unstable();
            prop_assert_eq!(sorted_ids, ids(&movies));
        }

        #[test]
        fn prop_desc_reverses_asc_without_ties(
            popularity in prop::collection::hash_set(0u32..100_000, 0..40),
        ) {
            let movies: Vec<MovieRecord> = popularity
                .into_iter()
                .enumerate()
                .map(|(i, p)| movie(i as u64, p as f64 / 100.0, 5.0))
                .collect();

            let mut asc = ids(&sort_movies(&movies, &SortOption::PopularityAsc));
            let desc = ids(&sort_movies(&movies, &SortOption::PopularityDesc));
            asc.reverse();
            prop_assert_eq!(asc, desc);
        }

        #[test]
        fn prop_unrecognized_keeps_order(
            keys in prop::collection::vec((0u8..20, 0u8..100), 0..40),
            raw in "[a-z_]{1,12}\\.(asc|desc)",
        ) {
            let option = SortOption::from(raw.as_str());
            prop_assume!(!option.is_recognized());
            let movies = movies_from(&keys);
            prop_assert_eq!(ids(&sort_movies(&movies, &option)), ids(&movies));
        }
    }
}
