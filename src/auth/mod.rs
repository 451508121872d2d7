// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HTTP Basic authentication for the account API.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Basic base64(username:password)`
//! 2. The [`basic_auth`](middleware::basic_auth) gate:
//!    - skips routes the [`RoutePolicy`] marks public
//!    - decodes the credentials ([`BasicCredentials`])
//!    - asks the [`CredentialVerifier`] for a [`Verification`]
//!    - maps the outcome to 401 / 403 / 404 or binds an [`AuthenticatedUser`]
//! 3. Handlers read the identity with the [`Auth`] extractor
//!
//! ## Security
//!
//! - Passwords are stored as bcrypt digests only (cost 10, random salt)
//! - Every 401 carries `WWW-Authenticate: Basic realm="Access to user account"`
//! - Raw passwords are never logged

pub mod basic;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod verifier;

pub use basic::BasicCredentials;
pub use error::AuthError;
pub use extractor::{Auth, AuthenticatedUser};
pub use policy::{PublicRoute, RoutePolicy};
pub use verifier::{CredentialVerifier, Verification};
