// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP error type and the JSON error envelope.
//!
//! Every failure leaving the service has the same body:
//!
//! ```json
//! {"error":"Conflict","message":"...","timestamp":"2026-01-31T12:00:00.000Z","path":"/v1/user"}
//! ```
//!
//! [`ApiError`] does not know the request path, so its response only carries
//! the error details as an extension. The [`error_envelope`] middleware, which
//! wraps the whole router, renders the body once the path is known.

use axum::{
    body::Body,
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{now_millis, timestamp_format};
use crate::storage::StorageError;

/// Realm advertised on every 401.
pub const BASIC_REALM: &str = r#"Basic realm="Access to user account""#;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    /// Short category, e.g. `"Validation Error"`.
    pub error: &'static str,
    pub message: String,
    pub headers: HeaderMap,
}

/// Error body shared by every failing response. Field order is part of the
/// contract.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = "Conflict")]
    pub error: String,
    #[schema(example = "A user with this email address already exists")]
    pub message: String,
    #[serde(serialize_with = "timestamp_format::serialize")]
    #[schema(value_type = String, example = "2026-01-31T12:00:00.000Z")]
    pub timestamp: DateTime<Utc>,
    #[schema(example = "/v1/user")]
    pub path: String,
}

/// Error details handed from [`ApiError::into_response`] to [`error_envelope`].
#[derive(Debug, Clone)]
struct PendingEnvelope {
    error: &'static str,
    message: String,
}

/// Marks a response whose empty body is part of its contract.
/// [`error_envelope`] never rewrites it.
#[derive(Debug, Clone, Copy)]
pub struct BareResponse;

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Registration payload failed validation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", message)
    }

    /// Profile update payload was rejected.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", message)
    }

    /// Missing or invalid credentials. Carries the Basic challenge.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let mut error = Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message);
        error
            .headers
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_REALM));
        error
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
            "Request method is not supported for this resource",
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict", message)
    }

    pub fn unsupported_media_type() -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
            "Content-Type must be application/json",
        )
    }

    pub fn payload_too_large() -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload Too Large",
            "Request body is too large",
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", message)
    }

    /// Catch-all for unexpected failures. The message never carries internal
    /// detail; log the cause before returning this.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An unexpected error occurred",
        )
    }

    /// Error for a status produced outside our handlers (framework
    /// rejections, merged routers).
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::not_found("Resource not found"),
            StatusCode::METHOD_NOT_ALLOWED => Self::method_not_allowed(),
            StatusCode::PAYLOAD_TOO_LARGE => Self::payload_too_large(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::unsupported_media_type(),
            s if s.is_server_error() => Self::new(
                s,
                s.canonical_reason().unwrap_or("Internal Server Error"),
                "An unexpected error occurred",
            ),
            s => Self::new(
                s,
                s.canonical_reason().unwrap_or("Bad Request"),
                "Request could not be processed",
            ),
        }
    }

    /// Render the envelope for a request path.
    pub fn envelope(&self, path: impl Into<String>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.error.to_string(),
            message: self.message.clone(),
            timestamp: now_millis(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.error, self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.headers).into_response();
        response.extensions_mut().insert(PendingEnvelope {
            error: self.error,
            message: self.message,
        });
        response
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Conflict(_) => {
                ApiError::conflict("A user with this email address already exists")
            }
            StorageError::NotFound(_) => ApiError::not_found("User account not found"),
            StorageError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                ApiError::service_unavailable("Service temporarily unavailable")
            }
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                ApiError::internal()
            }
        }
    }
}

/// Outermost middleware: turns pending error details into the JSON envelope.
///
/// Error responses that did not come from an [`ApiError`] (framework
/// rejections, routers merged from other crates) get a generic envelope for
/// their status. Successful responses, JSON bodies and responses marked
/// [`BareResponse`] pass through untouched.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    let pending = match response.extensions_mut().remove::<PendingEnvelope>() {
        Some(pending) => pending,
        None if needs_envelope(&response) => {
            let fallback = ApiError::from_status(response.status());
            PendingEnvelope {
                error: fallback.error,
                message: fallback.message,
            }
        }
        None => return response,
    };

    let envelope = ErrorEnvelope {
        error: pending.error.to_string(),
        message: pending.message,
        timestamp: now_millis(),
        path,
    };
    match serde_json::to_vec(&envelope) {
        Ok(body) => {
            let headers = response.headers_mut();
            headers.remove(CONTENT_LENGTH);
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *response.body_mut() = Body::from(body);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error envelope");
        }
    }
    response
}

fn needs_envelope(response: &Response) -> bool {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return false;
    }
    if response.extensions().get::<BareResponse>().is_some() {
        return false;
    }
    !response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}
