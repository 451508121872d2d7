// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Service
//!
//! Registration and self-service profile updates on top of [`AccountStore`].
//! Password hashing runs on the blocking pool.

pub mod patch;

use std::sync::Arc;

use crate::auth::password::{hash_password, PasswordError};
use crate::error::ApiError;
use crate::models::NewAccount;
use crate::storage::{Account, AccountStore, StorageError};

pub use patch::{PatchError, ProfilePatch};

pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with this email address already exists";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("username already registered")]
    Conflict,

    #[error("account not found")]
    NotFound,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Conflict(_) => ServiceError::Conflict,
            StorageError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Storage(other),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Conflict => ApiError::conflict(DUPLICATE_USERNAME_MESSAGE),
            ServiceError::NotFound => ApiError::not_found("User account not found"),
            ServiceError::Storage(e) => e.into(),
            other => {
                tracing::error!(error = %other, "User service failure");
                ApiError::internal()
            }
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    accounts: Arc<dyn AccountStore>,
}

impl UserService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Create a verified account with a hashed password.
    pub async fn register(&self, new: NewAccount) -> Result<Account, ServiceError> {
        if self.accounts.find_by_username(&new.username)?.is_some() {
            return Err(ServiceError::Conflict);
        }

        let password_hash = hash_blocking(new.password).await?;
        let account = Account::new(new.username, password_hash, new.first_name, new.last_name);
        self.accounts.create(&account)?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Fetch the account bound to an authenticated username.
    pub fn find_by_username(&self, username: &str) -> Result<Account, ServiceError> {
        self.accounts
            .find_by_username(username)?
            .ok_or(ServiceError::NotFound)
    }

    /// Apply `patch` to `account` and persist it.
    ///
    /// Returns `false` without touching the store when the patch carries no
    /// non-empty field.
    pub async fn update_profile(
        &self,
        mut account: Account,
        patch: ProfilePatch,
    ) -> Result<bool, ServiceError> {
        if patch.is_empty() {
            return Ok(false);
        }

        if let Some(first_name) = patch.first_name.filter(|v| !v.is_empty()) {
            account.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name.filter(|v| !v.is_empty()) {
            account.last_name = last_name;
        }
        if let Some(password) = patch.password.filter(|v| !v.is_empty()) {
            account.password_hash = hash_blocking(password).await?;
        }

        account.touch();
        self.accounts.update(&account)?;
        tracing::info!(account_id = %account.id, "Account updated");
        Ok(true)
    }
}

async fn hash_blocking(password: String) -> Result<String, ServiceError> {
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::storage::AppDatabase;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<AppDatabase>, UserService) {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(AppDatabase::open(&dir.path().join("svc.redb")).unwrap());
        let service = UserService::new(db.clone());
        (dir, db, service)
    }

    fn jane() -> NewAccount {
        NewAccount {
            username: "jane@x.com".into(),
            password: "longenough1".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_verifies_account() {
        let (_dir, db, service) = setup();
        let account = service.register(jane()).await.unwrap();

        assert!(account.verified);
        assert_eq!(account.account_created, account.account_updated);
        assert_ne!(account.password_hash, "longenough1");
        assert!(verify_password("longenough1", &account.password_hash));

        let stored = db.find_by_username("jane@x.com").unwrap().unwrap();
        assert_eq!(stored, account);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let (_dir, _db, service) = setup();
        service.register(jane()).await.unwrap();
        let err = service.register(jane()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));

        let api: ApiError = err.into();
        assert_eq!(api.message, DUPLICATE_USERNAME_MESSAGE);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let (_dir, _db, service) = setup();
        let a = service.register(jane()).await.unwrap();
        let b = service
            .register(NewAccount {
                username: "john@x.com".into(),
                ..jane()
            })
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_applies_fields_and_advances_timestamp() {
        let (_dir, db, service) = setup();
        let account = service.register(jane()).await.unwrap();

        let patch = ProfilePatch {
            first_name: Some("Janet".into()),
            password: Some("newpass99".into()),
            ..Default::default()
        };
        assert!(service.update_profile(account.clone(), patch).await.unwrap());

        let stored = db.find_by_username("jane@x.com").unwrap().unwrap();
        assert_eq!(stored.first_name, "Janet");
        assert_eq!(stored.last_name, "Doe");
        assert_eq!(stored.id, account.id);
        assert_eq!(stored.account_created, account.account_created);
        assert!(stored.account_updated > account.account_updated);
        assert!(verify_password("newpass99", &stored.password_hash));
    }

    #[tokio::test]
    async fn empty_patch_touches_nothing() {
        let (_dir, db, service) = setup();
        let account = service.register(jane()).await.unwrap();

        let patch = ProfilePatch {
            last_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!service.update_profile(account.clone(), patch).await.unwrap());

        let stored = db.find_by_username("jane@x.com").unwrap().unwrap();
        assert_eq!(stored, account);
    }

    #[tokio::test]
    async fn find_missing_account_is_not_found() {
        let (_dir, _db, service) = setup();
        assert!(matches!(
            service.find_by_username("ghost@x.com"),
            Err(ServiceError::NotFound)
        ));
    }
}
