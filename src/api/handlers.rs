use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{QueryAnswer, RecommendationReport},
    services::{knowledge, recommendations},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseQueryRequest {
    pub question: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub user: Option<String>,
    pub new_genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRatingRequest {
    pub user: Option<String>,
    pub movie: Option<String>,
    /// Number or string; stored as written
    pub rating: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Non-blank, trimmed value of a required field
fn required(value: Option<String>, message: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(message.to_string()))
}

/// Required field that is spliced into knowledge base facts or queries
fn required_symbol(value: Option<String>, field: &str, message: &str) -> AppResult<String> {
    let value = required(value, message)?;
    knowledge::validate_symbol(field, &value)?;
    Ok(value)
}

fn rating_text(rating: Option<Value>) -> Option<String> {
    match rating? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" }))
}

/// Recommendations, explanations, similar users and watch history for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationReport>> {
    let user = required_symbol(request.user, "User", "User is required")?;

    tracing::info!(request_id = %request_id, user = %user, "Processing recommendation request");

    let report = recommendations::recommend_for(state.engine.as_ref(), &user);
    Ok(Json(report))
}

/// Answers a free-text question
pub async fn parse_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ParseQueryRequest>,
) -> AppResult<Json<QueryAnswer>> {
    let question = request
        .question
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Question is required".to_string()))?;
    let subject = request
        .user
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| state.default_subject.clone());
    knowledge::validate_symbol("User", subject.trim())?;

    tracing::info!(
        request_id = %request_id,
        question = %question,
        user = %subject,
        "Processing question"
    );

    let answer = recommendations::answer_question(
        &state.parser,
        state.engine.as_ref(),
        &question,
        Some(subject.trim()),
    )
    .await?;

    Ok(Json(answer))
}

/// Registers a new user
pub async fn add_user(
    State(state): State<AppState>,
    Json(request): Json<AddUserRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let username = required(request.username, "Username is required")?;
    let username = knowledge::register_user(state.engine.as_ref(), &username)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("User '{}' added successfully", username),
        }),
    ))
}

/// Adds a genre preference for a user
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<MessageResponse>> {
    const MISSING: &str = "User and genre are required";
    let user = required_symbol(request.user, "User", MISSING)?;
    let genre = required_symbol(request.new_genre, "Genre", MISSING)?;

    knowledge::add_preference(state.engine.as_ref(), &user, &genre)?;

    Ok(Json(MessageResponse {
        message: format!("Genre preference '{}' added for {}", genre, user),
    }))
}

/// Lists users with a watch history
pub async fn get_users(State(state): State<AppState>) -> Json<UsersResponse> {
    let users = knowledge::list_users(state.engine.as_ref()).into_vec();
    Json(UsersResponse { users })
}

/// Records a user's rating of a movie
pub async fn add_rating(
    State(state): State<AppState>,
    Json(request): Json<AddRatingRequest>,
) -> AppResult<Json<MessageResponse>> {
    const MISSING: &str = "User, movie, and rating required";
    let user = required_symbol(request.user, "User", MISSING)?;
    let movie = required_symbol(request.movie, "Movie", MISSING)?;
    let rating = rating_text(request.rating)
        .ok_or_else(|| AppError::InvalidInput(MISSING.to_string()))?;
    knowledge::validate_symbol("Rating", &rating)?;

    knowledge::add_rating(state.engine.as_ref(), &user, &movie, &rating)?;

    Ok(Json(MessageResponse {
        message: format!("Rating {} added for {} by {}", rating, movie, user),
    }))
}

/// Lists every movie id in the knowledge base
pub async fn get_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    let movies = knowledge::list_movies(state.engine.as_ref()).into_vec();
    Json(MoviesResponse { movies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some(" bob ".into()), "x").unwrap(), "bob");
        assert!(required(Some("  ".into()), "x").is_err());
        assert!(required(None, "x").is_err());
    }

    #[test]
    fn test_rating_text() {
        assert_eq!(rating_text(Some(json!(5))), Some("5".to_string()));
        assert_eq!(rating_text(Some(json!(4.5))), Some("4.5".to_string()));
        assert_eq!(rating_text(Some(json!(" 3 "))), Some("3".to_string()));
        assert_eq!(rating_text(Some(json!(""))), None);
        assert_eq!(rating_text(Some(json!(null))), None);
        assert_eq!(rating_text(None), None);
    }
}
