//! API error types.

use crate::response::empty_envelope;
use crate::saga::UploadError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scheme_metadata::MetadataError;
use scheme_storage::StorageError;

/// Message returned for every 5xx response. Details are only logged.
pub const INTERNAL_ERROR_MSG: &str = "internal server error";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid file format: {0}")]
    Format(String),

    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("core error: {0}")]
    Core(#[from] scheme_core::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Format(_) | Self::CorruptArchive(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(e) => match e {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Metadata(e) => match e {
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                MetadataError::AlreadyExists(_) => StatusCode::CONFLICT,
                MetadataError::Constraint(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Core(e) => match e {
                scheme_core::Error::InvalidFormat(_)
                | scheme_core::Error::CorruptArchive(_)
                | scheme_core::Error::InvalidStatus(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message placed in the envelope.
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            return INTERNAL_ERROR_MSG.to_string();
        }
        match self {
            Self::Metadata(
                MetadataError::NotFound(msg)
                | MetadataError::AlreadyExists(msg)
                | MetadataError::Constraint(msg),
            ) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Format(msg) => Self::Format(msg),
            UploadError::CorruptArchive(msg) => Self::CorruptArchive(msg),
            UploadError::ObjectStore(e) => Self::Storage(e),
            UploadError::Metadata(e) => Self::Metadata(e),
            UploadError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        empty_envelope(status, self.client_message())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
