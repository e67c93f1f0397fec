use crate::errors::{CatalogError, StoreError};
use crate::models::{Comment, Movie, Rated, User};
use crate::store::{CasOutcome, CatalogStore, RatingAggregate};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Rounds to two decimal places, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Folds one more rating into a running average.
/// An empty aggregate divides by one, so the first rating becomes the baseline.
pub fn fold_rating(current: RatingAggregate, submitted: f64) -> RatingAggregate {
    let rated_by = current.rated_by + 1.0;
    RatingAggregate {
        rating: round2((current.rating * current.rated_by + submitted) / rated_by),
        rated_by,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Updated,
    AlreadyRated,
}

impl RatingOutcome {
    pub fn message(self) -> &'static str {
        match self {
            RatingOutcome::Updated => "Rating updated successfully",
            RatingOutcome::AlreadyRated => "Movie is already rated by user",
        }
    }
}

/// Domain operations over an injected store.
///
/// Each operation gets one deadline, `timeout` from its start, shared by
/// every store call it makes.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
    timeout: Duration,
    update_attempts: u32,
}

impl Catalog {
    /// `update_attempts` bounds the re-read/re-write rounds of a guarded
    /// movie update that keeps losing to concurrent writers.
    pub fn new(store: Arc<dyn CatalogStore>, timeout: Duration, update_attempts: u32) -> Self {
        Self {
            store,
            timeout,
            update_attempts: update_attempts.max(1),
        }
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    async fn within<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, CatalogError> {
        match tokio::time::timeout_at(deadline, call).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!("Store call failed: {e}");
                CatalogError::Store(e)
            }),
            Err(_) => {
                tracing::error!("Request exceeded its {:?} deadline", self.timeout);
                Err(CatalogError::Timeout(self.timeout))
            }
        }
    }

    /// Movies whose name contains `fragment` (case-insensitive). Empty matches all.
    pub async fn search_movies(&self, fragment: &str) -> Result<Vec<Movie>, CatalogError> {
        let movies = self
            .within(self.deadline(), self.store.find_movies(fragment))
            .await?;
        tracing::debug!("search {fragment:?} matched {} movies", movies.len());
        Ok(movies)
    }

    pub async fn fetch_user(&self, user_name: &str) -> Result<User, CatalogError> {
        self.find_user(self.deadline(), user_name).await
    }

    async fn find_user(&self, deadline: Instant, user_name: &str) -> Result<User, CatalogError> {
        self.within(deadline, self.store.find_user(user_name))
            .await?
            .ok_or_else(|| {
                tracing::warn!("user {user_name:?} not found");
                CatalogError::UserNotFound
            })
    }

    /// Records `rating` for the user, then folds it into the movie's aggregate.
    ///
    /// The two writes are independent: if the aggregate update fails, the
    /// user's `rated` list keeps the new entry.
    pub async fn add_rating(
        &self,
        user_name: &str,
        movie: &str,
        rating: f64,
    ) -> Result<RatingOutcome, CatalogError> {
        let deadline = self.deadline();
        let mut user = self.find_user(deadline, user_name).await?;
        if user.has_rated(movie) {
            metrics::counter!("catalog_ratings_duplicate_total").increment(1);
            return Ok(RatingOutcome::AlreadyRated);
        }

        user.rated.push(Rated {
            movie: movie.to_string(),
            rating,
        });
        let written = self
            .within(deadline, self.store.replace_rated(user_name, movie, &user.rated))
            .await?;
        if !written {
            // a concurrent request recorded this movie first
            tracing::warn!("{user_name:?} rated {movie:?} concurrently, skipping");
            metrics::counter!("catalog_ratings_duplicate_total").increment(1);
            return Ok(RatingOutcome::AlreadyRated);
        }

        for attempt in 1..=self.update_attempts {
            let current = self
                .within(deadline, self.store.find_movie(movie))
                .await?
                .map(|m| RatingAggregate::of(&m))
                .unwrap_or(RatingAggregate::EMPTY);
            let next = fold_rating(current, rating);

            match self
                .within(deadline, self.store.compare_and_set_rating(movie, current, next))
                .await?
            {
                CasOutcome::Applied => {
                    tracing::debug!(
                        "{movie}: rating {} over {} ratings",
                        next.rating,
                        next.rated_by
                    );
                    metrics::counter!("catalog_ratings_added_total").increment(1);
                    return Ok(RatingOutcome::Updated);
                }
                CasOutcome::Conflict => {
                    tracing::warn!("{movie}: aggregate changed during update (attempt {attempt})");
                }
                CasOutcome::Missing => {
                    tracing::warn!("{movie}: rated by {user_name:?} but not in catalog");
                    return Err(CatalogError::MovieNotFound);
                }
            }
        }

        Err(CatalogError::RatingConflict(movie.to_string()))
    }

    /// Appends `comment` to the movie's list, re-reading the list when a
    /// concurrent comment landed first.
    pub async fn add_comment(&self, movie: &str, comment: Comment) -> Result<(), CatalogError> {
        let deadline = self.deadline();

        for attempt in 1..=self.update_attempts {
            let Some(details) = self.within(deadline, self.store.find_movie(movie)).await? else {
                tracing::warn!("comment on unknown movie {movie:?}");
                return Err(CatalogError::MovieNotFound);
            };

            let expected_len = details.comments.len();
            let mut comments = details.comments;
            comments.push(comment.clone());

            match self
                .within(
                    deadline,
                    self.store.replace_comments(movie, expected_len, &comments),
                )
                .await?
            {
                CasOutcome::Applied => {
                    metrics::counter!("catalog_comments_added_total").increment(1);
                    return Ok(());
                }
                CasOutcome::Conflict => {
                    tracing::warn!("{movie}: comments changed during update (attempt {attempt})");
                }
                CasOutcome::Missing => return Err(CatalogError::MovieNotFound),
            }
        }

        Err(CatalogError::CommentConflict(movie.to_string()))
    }
}
