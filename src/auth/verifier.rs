// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification against the account store.

use std::sync::Arc;

use super::password::verify_password;
use crate::storage::{AccountStore, StorageError, StorageResult};

/// Outcome of checking a username/password pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// No account with this username.
    Absent,
    /// Account exists but is not verified. The password was not checked.
    Disabled,
    /// Password does not match.
    Invalid,
    /// Password matches an enabled account.
    Valid,
}

/// Checks Basic credentials. Read-only: never touches the stored row.
#[derive(Clone)]
pub struct CredentialVerifier {
    accounts: Arc<dyn AccountStore>,
}

impl CredentialVerifier {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Look up `username` (case-sensitive) and compare `password` to its hash.
    pub async fn verify(&self, username: &str, password: &str) -> StorageResult<Verification> {
        let Some(account) = self.accounts.find_by_username(username)? else {
            return Ok(Verification::Absent);
        };
        if !account.verified {
            return Ok(Verification::Disabled);
        }

        let password = password.to_owned();
        let hash = account.password_hash;
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| StorageError::Unavailable(format!("password check aborted: {e}")))?;

        Ok(if matches {
            Verification::Valid
        } else {
            Verification::Invalid
        })
    }
}
