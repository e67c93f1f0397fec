use super::{CasOutcome, CatalogStore, RatingAggregate};
use crate::errors::StoreError;
use crate::models::{Comment, Movie, Rated, User};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document, Regex};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

/// Stored shape of a user. The collection keys users by `username`,
/// while the API speaks `userName`.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    username: String,
    #[serde(default)]
    rated: Vec<Rated>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            user_name: doc.username,
            rated: doc.rated,
        }
    }
}

#[derive(Clone)]
pub struct MongoStore {
    movies: Collection<Movie>,
    users: Collection<UserDocument>,
}

impl MongoStore {
    /// Connects and pings the deployment so a bad URI fails at startup
    /// instead of on the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;

        tracing::info!("Connected to MongoDB database {database}");

        Ok(Self {
            movies: db.collection("movies"),
            users: db.collection("users"),
        })
    }

    /// Lookup index on movie names and a unique index on usernames.
    /// Existing duplicate data makes the unique build fail, which is logged only.
    pub async fn ensure_indexes(&self) {
        let by_name = IndexModel::builder().keys(doc! { "name": 1 }).build();
        if let Err(e) = self.movies.create_index(by_name).await {
            tracing::warn!("Failed to create movies.name index: {e}");
        }

        let by_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        if let Err(e) = self.users.create_index(by_username).await {
            tracing::warn!("Failed to create unique users.username index: {e}");
        }
    }
}

#[async_trait]
impl CatalogStore for MongoStore {
    async fn find_movies(&self, fragment: &str) -> Result<Vec<Movie>, StoreError> {
        // input is matched literally, never as a user-supplied pattern
        let pattern = Regex {
            pattern: regex::escape(fragment),
            options: "i".to_string(),
        };

        let movies: Vec<Movie> = self
            .movies
            .find(doc! { "name": pattern })
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(movies)
    }

    async fn find_movie(&self, name: &str) -> Result<Option<Movie>, StoreError> {
        Ok(self.movies.find_one(doc! { "name": name }).await?)
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        let user = self.users.find_one(doc! { "username": user_name }).await?;
        Ok(user.map(User::from))
    }

    async fn replace_rated(
        &self,
        user_name: &str,
        movie: &str,
        rated: &[Rated],
    ) -> Result<bool, StoreError> {
        let result = self
            .users
            .update_one(
                doc! { "username": user_name, "rated.movie": { "$ne": movie } },
                doc! { "$set": { "rated": bson::to_bson(rated)? } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn compare_and_set_rating(
        &self,
        name: &str,
        expected: RatingAggregate,
        next: RatingAggregate,
    ) -> Result<CasOutcome, StoreError> {
        let result = self
            .movies
            .update_one(
                aggregate_filter(name, expected),
                doc! { "$set": { "rating": next.rating, "ratedBy": next.rated_by } },
            )
            .await?;
        self.outcome(name, result.matched_count).await
    }

    async fn replace_comments(
        &self,
        name: &str,
        expected_len: usize,
        comments: &[Comment],
    ) -> Result<CasOutcome, StoreError> {
        let result = self
            .movies
            .update_one(
                comments_filter(name, expected_len),
                doc! { "$set": { "comments": bson::to_bson(comments)? } },
            )
            .await?;
        self.outcome(name, result.matched_count).await
    }
}

impl MongoStore {
    /// A guarded update that matched nothing either lost a race or hit no movie.
    async fn outcome(&self, name: &str, matched: u64) -> Result<CasOutcome, StoreError> {
        if matched > 0 {
            return Ok(CasOutcome::Applied);
        }
        match self.find_movie(name).await? {
            Some(_) => Ok(CasOutcome::Conflict),
            None => Ok(CasOutcome::Missing),
        }
    }
}

/// Matches a stored number the way `#[serde(default)]` read it: absent or
/// null fields decode as zero, so zero also matches those.
fn number_or_absent(value: f64) -> Bson {
    if value == 0.0 {
        Bson::Document(doc! { "$in": [0.0, null] })
    } else {
        Bson::Double(value)
    }
}

fn aggregate_filter(name: &str, expected: RatingAggregate) -> Document {
    doc! {
        "name": name,
        "rating": number_or_absent(expected.rating),
        "ratedBy": number_or_absent(expected.rated_by),
    }
}

fn comments_filter(name: &str, expected_len: usize) -> Document {
    if expected_len == 0 {
        doc! {
            "name": name,
            "$or": [
                { "comments": { "$size": 0 } },
                { "comments": { "$exists": false } },
                { "comments": null },
            ],
        }
    } else {
        doc! { "name": name, "comments": { "$size": expected_len as i64 } }
    }
}
