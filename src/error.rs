//! Error taxonomy for the query service.
//!
//! Every failure a handler can hit is an [`ApiError`]. Converting it into a
//! response happens in one place so each endpoint answers with the same JSON
//! shape: `{"error": "...", "available": [...]}`.

use std::path::PathBuf;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Message returned for every 500-class response. Causes stay in the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The dataset file could not be turned into a [`crate::data::Dataset`].
#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset {} must be a JSON object at the top level, found {found}", path.display())]
    NotAnObject { path: PathBuf, found: &'static str },
}

/// Per-request failure, mapped onto an HTTP status by [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    DatasetLoad(#[from] DatasetLoadError),

    /// Requested component or section is absent. `available` carries hints.
    #[error("{message}")]
    NotFound {
        message: String,
        available: Vec<String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("Route '{0}' not found")]
    UnknownRoute(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>, available: Vec<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            available,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DatasetLoad(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound { .. } | ApiError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
            available: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::DatasetLoad(e) => {
                error!(error = %e, "dataset unavailable");
                ErrorBody::internal()
            }
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                ErrorBody::internal()
            }
            ApiError::NotFound { message, available } => ErrorBody {
                error: message,
                available: Some(available),
            },
            other @ (ApiError::BadRequest(_) | ApiError::UnknownRoute(_)) => ErrorBody {
                error: other.to_string(),
                available: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
