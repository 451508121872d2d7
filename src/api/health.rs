// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, RawQuery, State},
    http::{
        header::{CACHE_CONTROL, PRAGMA, X_CONTENT_TYPE_OPTIONS},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::error::BareResponse;
use crate::models::now_millis;
use crate::state::AppState;

/// Raw request body; aliased so `utoipa` does not infer a request-body schema.
type RawBody = Result<Bytes, BytesRejection>;

/// Liveness check backed by a database write.
///
/// Every response has an empty body and is marked uncacheable. A GET with a
/// query string or a body is rejected, including bodies too large to buffer;
/// any other method (including HEAD) is a 405.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Health check row written"),
        (status = 400, description = "Query string or body present"),
        (status = 405, description = "Method other than GET"),
        (status = 503, description = "Database write failed")
    )
)]
pub async fn health(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: RawBody,
) -> Response {
    let status = if method != Method::GET {
        StatusCode::METHOD_NOT_ALLOWED
    } else if query.is_some_and(|q| !q.is_empty()) || body.map_or(true, |b| !b.is_empty()) {
        StatusCode::BAD_REQUEST
    } else {
        match state.health_checks.record_check(now_millis()) {
            Ok(record) => {
                tracing::debug!(id = record.id, "Health check recorded");
                StatusCode::OK
            }
            Err(e) => {
                tracing::warn!(error = %e, "Health check write failed");
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    };

    no_cache(status)
}

fn no_cache(status: StatusCode) -> Response {
    let mut response = (
        status,
        [
            (
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
            (PRAGMA, HeaderValue::from_static("no-cache")),
            (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
    )
        .into_response();
    response.extensions_mut().insert(BareResponse);
    response
}
