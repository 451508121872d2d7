// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{any::Any, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    BoxError, Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::basic_auth,
    error::{error_envelope, ApiError, ErrorEnvelope},
    models::{AccountResponse, CreateAccountRequest, UpdateAccountRequest},
    state::AppState,
};

pub mod extract;
pub mod health;
pub mod users;

/// Build the application router.
///
/// Layers, from the outside in: error envelope rendering, panic recovery,
/// request id, tracing, the Basic-auth gate, then the request timeout. The auth gate also
/// covers the fallback, so unknown paths require credentials.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/healthz", any(health::health))
        .route(
            "/v1/user",
            post(users::register).fallback(users::method_not_allowed),
        )
        .route(
            "/v1/user/self",
            get(users::get_self)
                .put(users::update_self)
                .fallback(users::method_not_allowed),
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), basic_auth))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(error_envelope))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::service_unavailable("Request timed out")
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}

/// Registers the HTTP Basic security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "basic",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Account Server API",
        description = "User registration, HTTP Basic authenticated self-service and a database-backed health check."
    ),
    paths(
        health::health,
        users::register,
        users::get_self,
        users::update_self
    ),
    components(
        schemas(
            AccountResponse,
            CreateAccountRequest,
            UpdateAccountRequest,
            ErrorEnvelope
        )
    ),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Users", description = "Account registration and self-service")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::to_bytes, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::storage::AppDatabase;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = Arc::new(AppDatabase::open(&dir.path().join("router.redb")).unwrap());
        let app = router(AppState::new(db), Duration::from_secs(30));
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_lists_every_route_and_basic_scheme() {
        let doc = ApiDoc::openapi();
        for path in ["/healthz", "/v1/user", "/v1/user/self"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("basic"));
        assert!(components.schemas.contains_key("ErrorEnvelope"));
    }

    #[tokio::test]
    async fn handler_panic_becomes_internal_error_envelope() {
        async fn boom() -> StatusCode {
            panic!("boom")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(error_envelope));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/boom")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["message"], "An unexpected error occurred");
        assert_eq!(json["path"], "/boom");
    }
}
