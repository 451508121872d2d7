// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Basic-auth gate for the whole router.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/user/self", get(get_self))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), basic_auth));
//! ```
//!
//! Public routes (see [`RoutePolicy`](super::RoutePolicy)) pass straight
//! through. Everything else needs valid credentials; on success the
//! [`AuthenticatedUser`] is placed in the request extensions for the
//! [`Auth`](super::Auth) extractor.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser, BasicCredentials, Verification};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn basic_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if !state
        .policy
        .requires_auth(request.method(), request.uri().path())
    {
        return next.run(request).await;
    }

    match authenticate(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            let path = request.uri().path();
            match &e {
                AuthError::InternalError(_) => {
                    tracing::error!(error = %e, %path, "Credential lookup failed")
                }
                AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                    tracing::warn!(code = e.error_code(), %path, "Authentication rejected")
                }
                _ => {}
            }
            e.into_response()
        }
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;
    let header = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    let credentials = BasicCredentials::parse(header)?;

    let outcome = state
        .verifier()
        .verify(&credentials.username, &credentials.password)
        .await
        .map_err(|e| AuthError::InternalError(e.to_string()))?;

    match outcome {
        Verification::Valid => Ok(AuthenticatedUser {
            username: credentials.username,
        }),
        Verification::Absent => {
            tracing::warn!(username = %credentials.username, "Unknown username");
            Err(AuthError::AccountNotFound)
        }
        Verification::Disabled => {
            tracing::warn!(username = %credentials.username, "Account not verified");
            Err(AuthError::AccountDisabled)
        }
        Verification::Invalid => {
            tracing::warn!(username = %credentials.username, "Password mismatch");
            Err(AuthError::InvalidCredentials)
        }
    }
}
