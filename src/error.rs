// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::Envelope;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing user session")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream answered 401. Recovered once by the session manager.
    #[error("Upstream authorization expired")]
    UpstreamAuthExpired,

    #[error("Upstream HTTP error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream request failed: {0}")]
    UpstreamTransport(String),

    #[error("Unexpected payload shape: {0}")]
    Mapping(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    /// Weekly accumulation stopped part-way; earlier weeks are persisted.
    #[error("Weekly stats incomplete, failed at week {failed_week}: {source}")]
    IncompleteSeason {
        failed_week: u32,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors the front door reports as 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// True when upstream rejected the access token.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, AppError::UpstreamAuthExpired)
    }

    /// Status code used by the HTTP envelope.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::UpstreamAuthExpired => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } | AppError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            AppError::Mapping(_)
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::IncompleteSeason { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Cache(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, details) = match &self {
            AppError::NotFound(msg) => (msg.clone(), None),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                ("Internal server error".to_string(), None)
            }
            AppError::IncompleteSeason { failed_week, .. } => {
                tracing::warn!(error = %self, failed_week, "Partial weekly stats");
                (
                    "Failed to retrieve team weekly stats".to_string(),
                    Some(serde_json::Value::String(self.to_string())),
                )
            }
            other => (
                other.to_string(),
                Some(serde_json::Value::String(other.to_string())),
            ),
        };

        let body = Envelope {
            code: status.as_u16(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
