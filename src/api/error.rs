//! Request error type.
//!
//! Errors are rendered as small HTML pages since every route serves HTML.
//! The status code alone distinguishes a failure from success.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{error, warn};

use super::pages;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    /// A required field is missing or malformed.
    #[error("Bad request: {message}")]
    #[diagnostic(code(microblog::api::bad_request))]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    #[diagnostic(code(microblog::api::not_found))]
    NotFound { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(microblog::api::io))]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An internal error occurred. Please try again later.".to_string()
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        (status, pages::error_page(status, &message)).into_response()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
        }
    }
}
