//! Store doubles for exercising failure paths.

use super::{CasOutcome, CatalogStore, MemoryStore, RatingAggregate};
use crate::errors::StoreError;
use crate::models::{Comment, Movie, Rated, User};
use async_trait::async_trait;
use std::io;
use std::time::Duration;

fn offline() -> StoreError {
    StoreError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "store offline"))
}

/// Every call fails as if the database were unreachable.
pub struct FailingStore;

#[async_trait]
impl CatalogStore for FailingStore {
    async fn find_movies(&self, _: &str) -> Result<Vec<Movie>, StoreError> {
        Err(offline())
    }
    async fn find_movie(&self, _: &str) -> Result<Option<Movie>, StoreError> {
        Err(offline())
    }
    async fn find_user(&self, _: &str) -> Result<Option<User>, StoreError> {
        Err(offline())
    }
    async fn replace_rated(&self, _: &str, _: &str, _: &[Rated]) -> Result<bool, StoreError> {
        Err(offline())
    }
    async fn compare_and_set_rating(
        &self,
        _: &str,
        _: RatingAggregate,
        _: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        Err(offline())
    }
    async fn replace_comments(
        &self,
        _: &str,
        _: usize,
        _: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        Err(offline())
    }
}

/// Never answers.
pub struct StalledStore;

#[async_trait]
impl CatalogStore for StalledStore {
    async fn find_movies(&self, _: &str) -> Result<Vec<Movie>, StoreError> {
        std::future::pending().await
    }
    async fn find_movie(&self, _: &str) -> Result<Option<Movie>, StoreError> {
        std::future::pending().await
    }
    async fn find_user(&self, _: &str) -> Result<Option<User>, StoreError> {
        std::future::pending().await
    }
    async fn replace_rated(&self, _: &str, _: &str, _: &[Rated]) -> Result<bool, StoreError> {
        std::future::pending().await
    }
    async fn compare_and_set_rating(
        &self,
        _: &str,
        _: RatingAggregate,
        _: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        std::future::pending().await
    }
    async fn replace_comments(
        &self,
        _: &str,
        _: usize,
        _: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        std::future::pending().await
    }
}

/// Delegates to a `MemoryStore` after sleeping `delay` on every call.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl CatalogStore for SlowStore {
    async fn find_movies(&self, fragment: &str) -> Result<Vec<Movie>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_movies(fragment).await
    }
    async fn find_movie(&self, name: &str) -> Result<Option<Movie>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_movie(name).await
    }
    async fn find_user(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_user(user_name).await
    }
    async fn replace_rated(
        &self,
        user_name: &str,
        movie: &str,
        rated: &[Rated],
    ) -> Result<bool, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.replace_rated(user_name, movie, rated).await
    }
    async fn compare_and_set_rating(
        &self,
        name: &str,
        expected: RatingAggregate,
        next: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.compare_and_set_rating(name, expected, next).await
    }
    async fn replace_comments(
        &self,
        name: &str,
        expected_len: usize,
        comments: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.replace_comments(name, expected_len, comments).await
    }
}

/// Reads like a `MemoryStore`, but every guarded movie write loses its race.
pub struct ContendedStore(pub MemoryStore);

#[async_trait]
impl CatalogStore for ContendedStore {
    async fn find_movies(&self, fragment: &str) -> Result<Vec<Movie>, StoreError> {
        self.0.find_movies(fragment).await
    }
    async fn find_movie(&self, name: &str) -> Result<Option<Movie>, StoreError> {
        self.0.find_movie(name).await
    }
    async fn find_user(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        self.0.find_user(user_name).await
    }
    async fn replace_rated(
        &self,
        user_name: &str,
        movie: &str,
        rated: &[Rated],
    ) -> Result<bool, StoreError> {
        self.0.replace_rated(user_name, movie, rated).await
    }
    async fn compare_and_set_rating(
        &self,
        _: &str,
        _: RatingAggregate,
        _: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        Ok(CasOutcome::Conflict)
    }
    async fn replace_comments(
        &self,
        _: &str,
        _: usize,
        _: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        Ok(CasOutcome::Conflict)
    }
}
