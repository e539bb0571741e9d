//! Error types for the ground truth backend

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Backend errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (bad provider name, unreadable config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failed or credentials missing
    #[error("{0}")]
    Unauthorized(String),

    /// Collection not found
    #[error("Collection with ID {0} not found")]
    CollectionNotFound(String),

    /// QA pair not found
    #[error("QA pair with ID {0} not found")]
    QaPairNotFound(String),

    /// Document not found
    #[error("Document with ID {0} not found")]
    DocumentNotFound(String),

    /// Template not found
    #[error("Template with ID {0} not found")]
    TemplateNotFound(String),

    /// Unknown data source provider requested by a client
    #[error("Invalid provider: {0}")]
    UnknownProvider(String),

    /// Request failed validation
    #[error("{0}")]
    Validation(String),

    /// Request is well-formed but its values are out of range
    #[error("{0}")]
    Unprocessable(String),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Token encoding/decoding error
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::CollectionNotFound(_)
            | Error::QaPairNotFound(_)
            | Error::DocumentNotFound(_)
            | Error::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            Error::UnknownProvider(_) | Error::Validation(_) | Error::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Config(_)
            | Error::Token(_)
            | Error::Json(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Unauthorized(_) => "unauthorized",
            Error::CollectionNotFound(_)
            | Error::QaPairNotFound(_)
            | Error::DocumentNotFound(_)
            | Error::TemplateNotFound(_) => "not_found",
            Error::UnknownProvider(_) => "invalid_provider",
            Error::Validation(_) => "validation_error",
            Error::Unprocessable(_) => "unprocessable",
            Error::Conflict(_) => "conflict",
            Error::Token(_) => "token_error",
            Error::Json(_) => "json_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        }));

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}
