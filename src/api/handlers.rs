use super::models::{CommentRequest, Envelope, MoviesBody, RatingRequest, UserRequest};
use crate::catalog::Catalog;
use crate::errors::ApiError;
use crate::models::User;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// GET /health — simple liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// GET /movies — the whole catalog
pub async fn get_movies(
    State(catalog): State<Arc<Catalog>>,
) -> Result<Json<Envelope<MoviesBody>>, ApiError> {
    search(&catalog, "").await
}

/// GET /movies/{name} — movies whose name contains `name`, ignoring case
pub async fn search_movies(
    State(catalog): State<Arc<Catalog>>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<MoviesBody>>, ApiError> {
    search(&catalog, &name).await
}

async fn search(catalog: &Catalog, fragment: &str) -> Result<Json<Envelope<MoviesBody>>, ApiError> {
    let movies = catalog.search_movies(fragment).await?;
    Ok(Json(Envelope::new(StatusCode::OK, movies.into())))
}

/// POST /addrating
pub async fn add_rating(
    State(catalog): State<Arc<Catalog>>,
    payload: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Json<Envelope<&'static str>>, ApiError> {
    let Json(req) = payload?;
    let outcome = catalog
        .add_rating(&req.user_name, &req.movie, req.rating)
        .await?;
    Ok(Json(Envelope::new(StatusCode::OK, outcome.message())))
}

/// POST /addcomment
pub async fn add_comment(
    State(catalog): State<Arc<Catalog>>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Envelope<&'static str>>, ApiError> {
    let Json(req) = payload?;
    catalog.add_comment(&req.movie, req.comment).await?;
    Ok(Json(Envelope::new(StatusCode::OK, "Successfully added comment")))
}

/// POST /userdetails — a user with the movies they rated
pub async fn user_details(
    State(catalog): State<Arc<Catalog>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let Json(req) = payload?;
    let user = catalog.fetch_user(&req.user_name).await?;
    Ok(Json(Envelope::new(StatusCode::OK, user)))
}
