// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Storage Module
//!
//! Persistent storage for account rows and health-check records, backed by an
//! embedded [redb](https://docs.rs/redb) database.
//!
//! ## Table Layout
//!
//! ```text
//! accounts           id (UUID string) → JSON-serialized Account
//! account_usernames  username         → id        (unique index)
//! health_checks      u64 id           → unix millis
//! ```
//!
//! ## Consistency
//!
//! redb serializes write transactions. The username uniqueness check and the
//! insert of a new account happen inside one write transaction, so two
//! concurrent registrations of the same username can never both commit.
//!
//! Handlers never talk to [`AppDatabase`] directly; they go through the
//! [`AccountStore`] and [`HealthCheckStore`] traits held in `AppState`.

pub mod accounts;
pub mod database;
pub mod health_checks;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use accounts::Account;
pub use database::AppDatabase;
pub use health_checks::HealthRecord;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A unique key is already taken.
    #[error("already exists: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The backing database cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Account persistence.
pub trait AccountStore: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`StorageError::Conflict`] when the username is taken.
    fn create(&self, account: &Account) -> StorageResult<()>;

    /// Look up an account by exact username.
    fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>>;

    /// Look up an account by id.
    fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>>;

    /// Overwrite an existing account row.
    ///
    /// Fails with [`StorageError::NotFound`] when the row does not exist.
    fn update(&self, account: &Account) -> StorageResult<()>;
}

/// Write-only health-check persistence.
pub trait HealthCheckStore: Send + Sync {
    /// Insert one health-check row stamped with `at`.
    fn record_check(&self, at: DateTime<Utc>) -> StorageResult<HealthRecord>;
}
