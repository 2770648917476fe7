//! Application error type with HTTP response conversion.
//!
//! Every fallible handler and service returns `Result<T, AppError>`. An
//! [`AppError`] pairs an HTTP status with an [`anyhow::Error`] carrying the
//! human-readable message, and renders itself as `{ "message": ... }`.
//!
//! | Constructor | Status | Meaning |
//! |-------------|--------|---------|
//! | [`AppError::bad_request`] | 400 | schema violation or business rule |
//! | [`AppError::unauthorized`] | 401 | absent, invalid or expired token |
//! | [`AppError::forbidden`] | 403 | role not permitted |
//! | [`AppError::not_found`] | 404 | referenced entity absent |
//! | [`AppError::internal`] | 500 | anything unexpected |
//!
//! Any error convertible into `anyhow::Error` (sqlx, bcrypt, jsonwebtoken)
//! becomes a 500 through `?`. Internal details are only sent to clients after
//! [`init_error_details`] has been called with `true` (development); otherwise
//! they are logged and replaced with a generic message.

use std::sync::OnceLock;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

static EXPOSE_INTERNAL_DETAILS: OnceLock<bool> = OnceLock::new();

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.into()))
    }

    /// The client-facing message.
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

/// Decides once, at startup, whether 5xx bodies carry the error chain.
pub fn init_error_details(expose: bool) {
    let _ = EXPOSE_INTERNAL_DETAILS.set(expose);
}

pub fn expose_internal_details() -> bool {
    EXPOSE_INTERNAL_DETAILS.get().copied().unwrap_or(false)
}

impl AppError {
    fn response_body(&self, expose_details: bool) -> Value {
        if !self.is_server_error() {
            return json!({ "message": self.message() });
        }

        if expose_details {
            json!({
                "message": INTERNAL_MESSAGE,
                "error": format!("{:#}", self.error),
            })
        } else {
            json!({ "message": INTERNAL_MESSAGE })
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = self.response_body(expose_internal_details());
        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
