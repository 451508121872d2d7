// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Which routes skip authentication.

use axum::http::Method;

/// A route that bypasses the Basic-auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoute {
    /// `None` matches every method.
    pub method: Option<Method>,
    pub path: &'static str,
}

/// Immutable table of public routes, built once at startup.
///
/// Anything not listed requires authentication, including paths no handler
/// serves.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    public: Vec<PublicRoute>,
}

impl RoutePolicy {
    pub fn new(public: Vec<PublicRoute>) -> Self {
        Self { public }
    }

    /// Health check on any method, plus registration.
    pub fn standard() -> Self {
        Self::new(vec![
            PublicRoute {
                method: None,
                path: "/healthz",
            },
            PublicRoute {
                method: Some(Method::POST),
                path: "/v1/user",
            },
        ])
    }

    pub fn requires_auth(&self, method: &Method, path: &str) -> bool {
        !self.public.iter().any(|route| {
            route.path == path && route.method.as_ref().is_none_or(|m| m == method)
        })
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::standard()
    }
}
