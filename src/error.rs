use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Empty question")]
    EmptyInput,

    #[error("No subject provided in parsed query")]
    MissingSubject,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Knowledge base error: {0}")]
    Engine(#[from] EngineError),
}

/// Failures raised by the reasoning engine
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("evaluation exceeded depth {0}")]
    DepthExceeded(usize),

    #[error("atom space lock poisoned")]
    Poisoned,

    #[error("failed to read knowledge base file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the language-model oracle. These never reach the client:
/// the intent parser falls back to rule-based parsing instead.
#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no JSON object in oracle output: {0}")]
    MissingJson(String),

    #[error("invalid JSON in oracle output: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid intent: {0}")]
    InvalidIntent(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::EmptyInput | AppError::MissingSubject => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(
            AppError::EmptyInput.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingSubject.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidInput("User is required".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_and_engine_statuses() {
        assert_eq!(
            AppError::Conflict("User 'bob' already exists".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(EngineError::Poisoned).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_error_display_includes_position() {
        let err = EngineError::Parse {
            position: 7,
            message: "unbalanced ')'".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at byte 7: unbalanced ')'");
    }
}
