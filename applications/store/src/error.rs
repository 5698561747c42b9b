/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(segue_storage::StorageError),

    #[error("Token sealing failed: {0}")]
    Cipher(#[from] segue_core::SegueError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<segue_storage::StorageError> for ServerError {
    fn from(err: segue_storage::StorageError) -> Self {
        match err {
            segue_storage::StorageError::NotFound { entity, id } => {
                ServerError::NotFound(format!("{} {}", entity, id))
            }
            segue_storage::StorageError::Duplicate(msg) => ServerError::Conflict(msg),
            other => ServerError::Storage(other),
        }
    }
}

impl From<segue_vault::VaultError> for ServerError {
    fn from(err: segue_vault::VaultError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Cipher(ref e) => {
                tracing::error!("Cipher error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token sealing failed".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
