use super::handlers;
use crate::catalog::Catalog;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds and returns the full Axum router with all routes and shared state.
pub fn build(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/movies", get(handlers::get_movies))
        .route("/movies/{name}", get(handlers::search_movies))
        .route("/addrating", post(handlers::add_rating))
        .route("/addcomment", post(handlers::add_comment))
        .route("/userdetails", post(handlers::user_details))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(catalog)
}
