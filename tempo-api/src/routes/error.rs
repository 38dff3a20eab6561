use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::{domain::TimeEntryError, repositories::RepositoryError};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TimerAlreadyRunning,
    TimerNotRunning,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseError(ref e) => {
                // Query detail stays in the logs, never in the response.
                tracing::error!("Database error: {:?}", e);
                Self::internal("internal storage error")
            }
            RepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            RepositoryError::Conflict(_) => {
                Self::conflict("timer already running").with_code(ErrorCode::TimerAlreadyRunning)
            }
        }
    }
}

impl From<TimeEntryError> for ApiError {
    fn from(err: TimeEntryError) -> Self {
        match err {
            TimeEntryError::MissingField(_)
            | TimeEntryError::InvalidField { .. }
            | TimeEntryError::EndBeforeStart
            | TimeEntryError::InvalidDate(_)
            | TimeEntryError::InvalidDateRange => Self::bad_request(err.to_string()),
            TimeEntryError::TimerAlreadyRunning => {
                Self::conflict(err.to_string()).with_code(ErrorCode::TimerAlreadyRunning)
            }
            TimeEntryError::NotRunning => {
                Self::bad_request(err.to_string()).with_code(ErrorCode::TimerNotRunning)
            }
        }
    }
}
