//! Error types for exo-web
//!
//! One enum covers every component (image store, pair picker, selection
//! log, HTTP layer). Each variant maps to an HTTP status and a JSON body
//! of the form `{"error": {"code": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// exo-web error type
#[derive(Debug, Error)]
pub enum Error {
    /// Image directory missing or unreadable (503)
    #[error("Image store unavailable: {0}")]
    StoreUnavailable(String),

    /// Asset id not present in the current listing (404)
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Source image unreadable or corrupt (422)
    #[error("Cannot convert image {id}: {reason}")]
    ConversionError { id: String, reason: String },

    /// Fewer than two assets to compare (409)
    #[error("At least two images are required, found {0}")]
    InsufficientAssets(usize),

    /// Selection log could not be written (500)
    #[error("Cannot write selection log: {0}")]
    WriteError(String),

    /// Selection log could not be read back (500)
    #[error("Cannot read selection log: {0}")]
    ReadError(String),

    /// Selection log could not be archived; current log left intact (500)
    #[error("Cannot archive selection log: {0}")]
    ArchiveError(String),

    /// Submitted decision is inconsistent with the shown pair (400)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Anything else (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the exo-web Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            Error::AssetNotFound(_) => (StatusCode::NOT_FOUND, "ASSET_NOT_FOUND"),
            Error::ConversionError { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CONVERSION_ERROR")
            }
            Error::InsufficientAssets(_) => (StatusCode::CONFLICT, "INSUFFICIENT_ASSETS"),
            Error::WriteError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "WRITE_ERROR"),
            Error::ReadError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "READ_ERROR"),
            Error::ArchiveError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ARCHIVE_ERROR"),
            Error::InvalidSelection(_) => (StatusCode::BAD_REQUEST, "INVALID_SELECTION"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("{} ({})", message, code);
        } else {
            warn!("{} ({})", message, code);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
