// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded account database backed by redb (pure Rust, ACID).

use std::path::Path;

use redb::{Database, TableDefinition};

use super::StorageResult;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: account id → serialized Account (JSON bytes).
pub(super) const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Unique index: username → account id.
pub(super) const ACCOUNT_USERNAMES: TableDefinition<&str, &str> =
    TableDefinition::new("account_usernames");

/// Health checks: monotonic id → unix timestamp in milliseconds.
pub(super) const HEALTH_CHECKS: TableDefinition<u64, i64> = TableDefinition::new("health_checks");

// =============================================================================
// AppDatabase
// =============================================================================

/// Embedded ACID database holding every table the service owns.
pub struct AppDatabase {
    db: Database,
}

impl AppDatabase {
    /// Open (or create) the database at the given path.
    ///
    /// All tables are created up front so later read transactions never fail
    /// on a missing table.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(ACCOUNT_USERNAMES)?;
            let _ = write_txn.open_table(HEALTH_CHECKS)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Account database ready");

        Ok(Self { db })
    }

    pub(super) fn inner(&self) -> &Database {
        &self.db
    }
}
