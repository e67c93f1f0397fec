pub mod memory;
pub mod mongo;
#[cfg(test)]
pub mod testing;

use crate::errors::StoreError;
use crate::models::{Comment, Movie, Rated, User};
use async_trait::async_trait;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// The `rating`/`ratedBy` pair of a movie document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub rating: f64,
    pub rated_by: f64,
}

impl RatingAggregate {
    pub const EMPTY: RatingAggregate = RatingAggregate {
        rating: 0.0,
        rated_by: 0.0,
    };

    pub fn of(movie: &Movie) -> Self {
        Self {
            rating: movie.rating,
            rated_by: movie.rated_by,
        }
    }
}

/// Result of a guarded write on a movie document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Applied,
    /// The stored value no longer matches what the caller read.
    Conflict,
    Missing,
}

/// Lookup/update contract over the `movies` and `users` collections.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Movies whose name contains `fragment`, ignoring case, ordered by name.
    async fn find_movies(&self, fragment: &str) -> Result<Vec<Movie>, StoreError>;

    async fn find_movie(&self, name: &str) -> Result<Option<Movie>, StoreError>;

    async fn find_user(&self, user_name: &str) -> Result<Option<User>, StoreError>;

    /// Replaces the user's whole `rated` list, but only while the stored list
    /// still has no entry for `movie`. Returns false when nothing was written.
    async fn replace_rated(
        &self,
        user_name: &str,
        movie: &str,
        rated: &[Rated],
    ) -> Result<bool, StoreError>;

    async fn compare_and_set_rating(
        &self,
        name: &str,
        expected: RatingAggregate,
        next: RatingAggregate,
    ) -> Result<CasOutcome, StoreError>;

    /// Replaces the movie's whole `comments` list while the stored list still
    /// holds `expected_len` entries.
    async fn replace_comments(
        &self,
        name: &str,
        expected_len: usize,
        comments: &[Comment],
    ) -> Result<CasOutcome, StoreError>;
}
