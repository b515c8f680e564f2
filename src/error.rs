// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("a reply is still on its way, please wait for it before sending another message")]
    Busy { session_id: String },

    #[error("{message}")]
    UpstreamUnavailable {
        message: String,
        session_id: Option<String>,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Busy { .. } => StatusCode::CONFLICT,
            AppError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the session the failed turn was recorded in.
    pub fn in_session(self, id: &str) -> Self {
        match self {
            AppError::UpstreamUnavailable { message, .. } => AppError::UpstreamUnavailable {
                message,
                session_id: Some(id.to_string()),
            },
            other => other,
        }
    }

    fn session_id(&self) -> Option<String> {
        match self {
            AppError::Busy { session_id } => Some(session_id.clone()),
            AppError::UpstreamUnavailable { session_id, .. } => session_id.clone(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            session_id: self.session_id(),
        };
        (self.status(), Json(body)).into_response()
    }
}
