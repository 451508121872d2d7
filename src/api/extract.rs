// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors with envelope-shaped rejections.

use axum::{
    extract::{
        rejection::{BytesRejection, JsonRejection},
        FromRequest, Request,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};

use crate::error::ApiError;

/// `Json<T>` whose rejections are reported as [`ApiError`]s.
///
/// A missing or non-JSON `Content-Type` is a 415; anything that fails to
/// parse into `T` is a 400 validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::unsupported_media_type(),
            JsonRejection::BytesRejection(inner) => inner.into(),
            other => {
                tracing::debug!(error = %other, "Rejected JSON body");
                ApiError::validation("Malformed JSON request")
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large()
        } else {
            tracing::debug!(error = %rejection, "Failed to read request body");
            ApiError::bad_request("Request body could not be read")
        }
    }
}

/// True when the `Content-Type` media type is `application/json`.
///
/// Parameters such as `charset` are ignored and the comparison is
/// case-insensitive.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Payload, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let request = builder.body(Body::from(body.to_owned())).unwrap();
        JsonBody::<Payload>::from_request(request, &())
            .await
            .map(|JsonBody(p)| p)
    }

    #[tokio::test]
    async fn parses_json_body() {
        let payload = extract(Some("application/json"), r#"{"name":"x"}"#)
            .await
            .unwrap();
        assert_eq!(payload.name, "x");
    }

    #[tokio::test]
    async fn missing_content_type_is_415() {
        let err = extract(None, r#"{"name":"x"}"#).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = extract(Some("text/plain"), r#"{"name":"x"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn syntax_and_type_errors_are_malformed() {
        for body in ["{not json", r#"{"name":5}"#, "[]"] {
            let err = extract(Some("application/json"), body).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(err.error, "Validation Error");
            assert_eq!(err.message, "Malformed JSON request");
        }
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(3 * 1024 * 1024));
        let err = extract(Some("application/json"), &body).await.unwrap_err();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error, "Payload Too Large");
    }

    #[test]
    fn content_type_essence_ignores_parameters_and_case() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));

        for value in [
            "application/json",
            "Application/JSON",
            "application/json; charset=utf-8",
        ] {
            headers.insert(CONTENT_TYPE, value.parse().unwrap());
            assert!(is_json_content_type(&headers), "{value}");
        }

        for value in ["text/plain", "application/jsonx", "application/xml"] {
            headers.insert(CONTENT_TYPE, value.parse().unwrap());
            assert!(!is_json_content_type(&headers), "{value}");
        }
    }
}
