//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure taxonomy: validation failures, unique-key conflicts,
//! authentication failures, scope-aware not-found, and store faults.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into the corresponding HTTP responses. `From` trait
//! implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow handlers to
//! use the `?` operator throughout.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or disallowed input fields (HTTP 400). Carries detail for the caller.
    Validation(String),
    /// A write collided with a unique key, currently only the account email (HTTP 400).
    Conflict(String),
    /// Missing, invalid, or revoked credentials (HTTP 401).
    /// Intentionally carries no detail: the response body is the same whether
    /// the email was unknown, the password wrong, or the token revoked.
    Authentication,
    /// The entity is absent, or exists outside the caller's ownership scope (HTTP 404).
    /// The two cases are reported identically.
    NotFound,
    /// An error originating from store operations (HTTP 500).
    /// The wrapped detail is logged server-side and never sent to the caller.
    Database(String),
    /// An unexpected server-side fault (HTTP 500). Detail is logged, not leaked.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Authentication => write!(f, "Authentication failed."),
            AppError::NotFound => write!(f, "Not Found"),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Authentication responses use a fixed generic body, not-found responses have
/// an empty body, and store faults surface as a generic 500 with the detail
/// kept in the server log.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Authentication => HttpResponse::Unauthorized().json(json!({
                "error": "Authentication failed."
            })),
            AppError::NotFound => HttpResponse::NotFound().finish(),
            AppError::Database(detail) => {
                log::error!("store failure: {}", detail);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::Internal(detail) => {
                log::error!("internal failure: {}", detail);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, a unique-constraint violation (SQLSTATE
/// 23505) maps to `Conflict` so concurrent duplicate registrations have
/// exactly one winner, and everything else becomes `Database`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("Email already registered".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Token processing failures (bad signature, malformed token) are
/// authentication failures; the jsonwebtoken detail is discarded.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Authentication
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
