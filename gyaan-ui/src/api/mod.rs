//! HTTP API handlers for gyaan-ui

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod sse;
pub mod student;
pub mod teacher;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gyaan_common::identity::Role;
use gyaan_common::Error;
use serde_json::json;

use crate::session::{ActiveUser, Session};

/// Error type returned by API handlers.
///
/// Validation failures surface as structured inline messages (HTTP 400
/// plus a message body), never as panics or opaque 500s.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Require an authenticated user of the given role.
///
/// The session store itself treats missing identities as silent no-ops;
/// rejecting unauthenticated or wrong-role requests is this layer's job.
pub fn require_role(session: &Session, role: Role) -> Result<ActiveUser, ApiError> {
    match &session.user {
        Some(user) if user.role == role => Ok(user.clone()),
        Some(_) => Err(ApiError::forbidden(format!(
            "This operation requires a {} account",
            role.as_str()
        ))),
        None => Err(ApiError::unauthorized("Not logged in")),
    }
}
