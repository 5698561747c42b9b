//! Error types for the Segue HTTP clients.

use reqwest::{header::RETRY_AFTER, Response, StatusCode};
use segue_core::SegueError;
use thiserror::Error;

/// Errors that can occur when talking to the store or the playback service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed (invalid or expired token)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid service URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline, unreachable or too slow
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Whether retrying later is expected to help.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_decode(),
            Self::ServerError { status, .. } => *status == 408 || *status >= 500,
            Self::ServerUnreachable(_) | Self::RateLimited { .. } => true,
            Self::AuthFailed(_) | Self::InvalidUrl(_) | Self::ParseError(_) => false,
        }
    }
}

/// Map a transport failure, separating "could not reach it" from the rest.
pub(crate) fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Turn a non-success response into the matching error.
pub(crate) async fn status_error(response: Response) -> ClientError {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(1);
        return ClientError::RateLimited { retry_after_secs };
    }

    let error_text = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ClientError::AuthFailed(error_text)
    } else {
        ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        }
    }
}

impl From<ClientError> for SegueError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthFailed(msg) => SegueError::auth(msg),
            ClientError::InvalidUrl(msg) => SegueError::invalid_input(msg),
            ClientError::ParseError(msg) => SegueError::InvalidResponse(msg),
            ClientError::ServerError { status: 404, message } => {
                SegueError::not_found("Resource", message)
            }
            other if other.is_transient() => SegueError::transient(other.to_string()),
            other => SegueError::Other(other.to_string()),
        }
    }
}
