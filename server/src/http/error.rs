//! HTTP boundary error.
//!
//! Input problems are echoed to the client with a 400. Storage and upload
//! failures are logged with their cause and answered with a generic 500
//! message; the cause never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::parsers::InputError;
use crate::persistence::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: PersistenceError,
    },
    #[error("{message}")]
    Upload {
        message: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn storage(message: &'static str, source: PersistenceError) -> Self {
        Self::Storage { message, source }
    }

    pub fn upload(message: &'static str, source: std::io::Error) -> Self {
        Self::Upload { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage { .. } | Self::Upload { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest(message) => {
                tracing::debug!(%message, "Rejected request");
            }
            Self::Storage { message, source } => {
                tracing::error!(error = %source, "{}", message);
            }
            Self::Upload { message, source } => {
                tracing::error!(error = %source, "{}", message);
            }
        }
        (self.status(), self.to_string()).into_response()
    }
}
