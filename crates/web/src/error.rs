use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors. Every variant renders as `{"detail": <message>}`, which
/// is the body shape the client parses on non-2xx responses.
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Not authenticated"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Storage(e) => match e {
                StorageError::NotFound => {
                    (StatusCode::NOT_FOUND, "Resource not found".to_string())
                }
                StorageError::SelectionNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                // The original service reports unknown participants as 403.
                StorageError::UnknownUser(_) => (StatusCode::FORBIDDEN, e.to_string()),
                StorageError::InsufficientParticipants
                | StorageError::NoEligibleUsers
                | StorageError::NoUnusedRecords(_)
                | StorageError::RatingOutOfRange(_)
                | StorageError::RecordInUse => (StatusCode::BAD_REQUEST, e.to_string()),
                StorageError::ClaimConflict => (StatusCode::CONFLICT, e.to_string()),
                StorageError::ConstraintViolation(msg) => (StatusCode::CONFLICT, msg.clone()),
                StorageError::Database(_)
                | StorageError::Migration(_)
                | StorageError::Serialization(_) => {
                    tracing::error!("Storage error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (StatusCode::BAD_REQUEST, field_errors.join("; "))
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authenticated".to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;
