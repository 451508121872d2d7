// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Client-facing message shared by every 401.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Authentication credentials are missing or invalid";

/// Client-facing message for an unknown username.
pub const ACCOUNT_NOT_FOUND_MESSAGE: &str = "User account not found";

/// Client-facing message for an unverified account.
pub const ACCOUNT_DISABLED_MESSAGE: &str = "Account has not been verified. Please check your email.";

/// Authentication error type.
///
/// Several variants collapse onto the same client response; the distinction
/// is kept for logging.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not `Basic <base64(username:password)>`
    InvalidAuthHeader,
    /// Password does not match the stored hash
    InvalidCredentials,
    /// No account with this username
    AccountNotFound,
    /// Account exists but is not verified
    AccountDisabled,
    /// Credential lookup failed
    InternalError(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::AccountDisabled => "account_disabled",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Lookup failures are reported as 401 like any other credential check
    /// that did not succeed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidCredentials
            | AuthError::InternalError(_) => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::AccountDisabled => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Basic <credentials>')")
            }
            AuthError::InvalidCredentials => write!(f, "Password does not match"),
            AuthError::AccountNotFound => write!(f, "No account with this username"),
            AuthError::AccountDisabled => write!(f, "Account is not verified"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AccountNotFound => ApiError::not_found(ACCOUNT_NOT_FOUND_MESSAGE),
            AuthError::AccountDisabled => ApiError::forbidden(ACCOUNT_DISABLED_MESSAGE),
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidCredentials
            | AuthError::InternalError(_) => ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
