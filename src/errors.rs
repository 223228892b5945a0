use astra::Response;
// errors.rs
use thiserror::Error;

use crate::auth::{AuthError, FieldError};
use crate::domain::{ListingError, LoadError};

/// Errors originating from either the server logic
/// (routing, bad input, auth) or downstream layers (listing store).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("too many requests, please try again later")]
    TooManyRequests,
    #[error("{0}")]
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::NotFound(_) => 404,
            ServerError::Conflict(_) => 409,
            ServerError::Validation(_) => 422,
            ServerError::TooManyRequests => 429,
            ServerError::Internal(_) => 500,
        }
    }

    /// Machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Unauthorized(_) => "UNAUTHORIZED",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::Conflict(_) => "CONFLICT",
            ServerError::Validation(_) => "VALIDATION_ERROR",
            ServerError::TooManyRequests => "RATE_LIMIT_EXCEEDED",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ListingError> for ServerError {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::NotFound(_) => ServerError::NotFound(e.to_string()),
            ListingError::InvalidInput(msg) => ServerError::BadRequest(msg),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ServerError::Unauthorized("Invalid email or password".into()),
            AuthError::InvalidToken => ServerError::Unauthorized("Invalid or expired token".into()),
            AuthError::EmailTaken(_) => ServerError::Conflict(e.to_string()),
            AuthError::Validation(errors) => ServerError::Validation(errors),
            AuthError::UserNotFound => ServerError::NotFound("User not found".into()),
            AuthError::Token(err) => ServerError::Internal(format!("token error: {err}")),
        }
    }
}

impl From<LoadError> for ServerError {
    fn from(e: LoadError) -> Self {
        ServerError::Internal(e.to_string())
    }
}
