use crate::models::{Comment, Movie};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Every API response: the HTTP status repeated in the body, plus the payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status: status.as_u16(),
            body,
        }
    }
}

/// Payload of GET /movies and GET /movies/{name}
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MoviesBody {
    Found(Vec<Movie>),
    Empty(&'static str),
}

impl From<Vec<Movie>> for MoviesBody {
    fn from(movies: Vec<Movie>) -> Self {
        if movies.is_empty() {
            MoviesBody::Empty("No movies found")
        } else {
            MoviesBody::Found(movies)
        }
    }
}

/// Body of POST /addrating
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub movie: String,
    pub rating: f64,
}

/// Body of POST /addcomment
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(rename = "movieName")]
    pub movie: String,
    pub comment: Comment,
}

/// Body of POST /userdetails
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
}
