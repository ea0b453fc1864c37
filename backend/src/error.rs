use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartRejection),

    #[error("Invalid multipart field: {0}")]
    MultipartField(#[from] MultipartError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Json(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::Multipart(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::MultipartField(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::Validation(e) => {
                let mut messages: Vec<String> = e
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let msgs: Vec<&str> = errors
                            .iter()
                            .filter_map(|err| err.message.as_ref().map(|m| m.as_ref()))
                            .collect();
                        if msgs.is_empty() {
                            let codes: Vec<&str> =
                                errors.iter().map(|err| err.code.as_ref()).collect();
                            format!("{}: {}", field, codes.join(", "))
                        } else {
                            format!("{}: {}", field, msgs.join(", "))
                        }
                    })
                    .collect();
                messages.sort();
                (StatusCode::BAD_REQUEST, messages.join("; "))
            }
            AppError::Database(e) => {
                // Unique violations are caller mistakes (duplicate audience name etc.)
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.is_unique_violation() {
                        tracing::warn!("Unique constraint violation: {}", db_err.message());
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "A record with that value already exists" })),
                        )
                            .into_response();
                    }
                    if db_err.is_check_violation() {
                        tracing::warn!("Check constraint violation: {}", db_err.message());
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "A field has an invalid value" })),
                        )
                            .into_response();
                    }
                }
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
