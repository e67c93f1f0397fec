use super::{CasOutcome, CatalogStore, RatingAggregate};
use crate::errors::StoreError;
use crate::models::{Comment, Movie, Rated, User};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Shape of the JSON file accepted by `MemoryStore::from_seed_file`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// In-process store. Each map entry is locked independently, so guarded
/// updates on one movie or user are atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    movies: Arc<DashMap<String, Movie>>,
    users: Arc<DashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for movie in seed.movies {
            store.insert_movie(movie);
        }
        for user in seed.users {
            store.insert_user(user);
        }
        store
    }

    pub async fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: Seed = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded seed {}: {} movies, {} users",
            path.display(),
            seed.movies.len(),
            seed.users.len()
        );
        Ok(Self::from_seed(seed))
    }

    pub fn insert_movie(&self, movie: Movie) {
        self.movies.insert(movie.name.clone(), movie);
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.user_name.clone(), user);
    }

    pub fn movie(&self, name: &str) -> Option<Movie> {
        self.movies.get(name).map(|r| r.clone())
    }

    pub fn user(&self, user_name: &str) -> Option<User> {
        self.users.get(user_name).map(|r| r.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_movies(&self, fragment: &str) -> Result<Vec<Movie>, StoreError> {
        let mut movies: Vec<Movie> = self
            .movies
            .iter()
            .filter(|r| r.value().name_contains(fragment))
            .map(|r| r.value().clone())
            .collect();
        movies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(movies)
    }

    async fn find_movie(&self, name: &str) -> Result<Option<Movie>, StoreError> {
        Ok(self.movie(name))
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.user(user_name))
    }

    async fn replace_rated(
        &self,
        user_name: &str,
        movie: &str,
        rated: &[Rated],
    ) -> Result<bool, StoreError> {
        let Some(mut user) = self.users.get_mut(user_name) else {
            return Ok(false);
        };
        if user.has_rated(movie) {
            return Ok(false);
        }
        user.rated = rated.to_vec();
        Ok(true)
    }

    async fn compare_and_set_rating(
        &self,
        name: &str,
        expected: RatingAggregate,
        next: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        let Some(mut movie) = self.movies.get_mut(name) else {
            return Ok(CasOutcome::Missing);
        };
        if RatingAggregate::of(&movie) != expected {
            return Ok(CasOutcome::Conflict);
        }
        movie.rating = next.rating;
        movie.rated_by = next.rated_by;
        Ok(CasOutcome::Applied)
    }

    async fn replace_comments(
        &self,
        name: &str,
        expected_len: usize,
        comments: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        let Some(mut movie) = self.movies.get_mut(name) else {
            return Ok(CasOutcome::Missing);
        };
        if movie.comments.len() != expected_len {
            return Ok(CasOutcome::Conflict);
        }
        movie.comments = comments.to_vec();
        Ok(CasOutcome::Applied)
    }
}
