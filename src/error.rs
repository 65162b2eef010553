use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("malformed timestamp '{0}': expected ISO 8601 'YYYY-MM-DDTHH:MM:SS.ffffffZ'")]
    MalformedTimestamp(String),
    #[error("id '{id}': type must be FILE or FOLDER")]
    InvalidType { id: String },
    #[error("id '{id}': size must be null for a FOLDER and strictly positive for a FILE")]
    InvalidSize { id: String },
    #[error("id '{id}': parent '{parent_id}' does not exist or is not a folder")]
    InvalidParent { id: String, parent_id: String },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedTimestamp(_)
            | AppError::InvalidType { .. }
            | AppError::InvalidSize { .. }
            | AppError::InvalidParent { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
