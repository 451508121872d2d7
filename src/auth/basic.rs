// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `Authorization: Basic` header parsing.

use base64ct::{Base64, Encoding};

use super::AuthError;

/// Credentials decoded from a Basic authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicCredentials {
    /// Parse the value of an `Authorization` header.
    ///
    /// The scheme is matched case-insensitively. The username is everything
    /// before the first `:` of the decoded payload.
    pub fn parse(header: &str) -> Result<Self, AuthError> {
        let (scheme, encoded) = header
            .trim()
            .split_once(' ')
            .ok_or(AuthError::InvalidAuthHeader)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::InvalidAuthHeader);
        }

        let decoded =
            Base64::decode_vec(encoded.trim()).map_err(|_| AuthError::InvalidAuthHeader)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidAuthHeader)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidAuthHeader)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
