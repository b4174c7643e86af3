use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations and questions
        .route("/get-recommendations", post(handlers::get_recommendations))
        .route("/parse-query", post(handlers::parse_query))
        // Knowledge base updates
        .route("/add-user", post(handlers::add_user))
        .route("/update-preferences", post(handlers::update_preferences))
        .route("/add-rating", post(handlers::add_rating))
        // Listings
        .route("/get-users", get(handlers::get_users))
        .route("/get-movies", get(handlers::get_movies))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
