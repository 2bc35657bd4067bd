use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Pull request already exists: {0}")]
    AlreadyExists(String),

    #[error("Team already exists: {0}")]
    TeamExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Pull request is already merged: {0}")]
    AlreadyMerged(String),

    #[error("Reviewer is not assigned: {0}")]
    NotAssigned(String),

    #[error("No available candidate for reassignment: {0}")]
    NoCandidate(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl AppError {
    /// Stable machine-readable code, independent of the message text.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyExists(_) => "PR_EXISTS",
            AppError::TeamExists(_) => "TEAM_EXISTS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyMerged(_) => "PR_MERGED",
            AppError::NotAssigned(_) => "NOT_ASSIGNED",
            AppError::NoCandidate(_) => "NO_CANDIDATE",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "INVALID_TOKEN",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "SERVER_ERROR",
        }
    }

    /// Message safe to hand to clients. Store failures are not echoed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        error
            .as_database_error()
            .and_then(|db_error| db_error.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION)
    }

    pub fn internal_server_error() -> Self {
        AppError::InternalServerError(None)
    }
}

/// Rejects blank identifiers before they reach the store.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::TeamExists(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyMerged(_) => StatusCode::CONFLICT,
            AppError::NotAssigned(_) => StatusCode::CONFLICT,
            AppError::NoCandidate(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::info!("Request rejected with status {}: {}", status_code, self);
        }

        let response_body = ApiResponse::<()>::error_with_code(self.code(), &self.public_message());

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        // Keep store failures classified as such
        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}
