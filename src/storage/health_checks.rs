// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Write-only health-check records.
//!
//! Every liveness check inserts one row; rows are never read back by the
//! service, updated or deleted.

use chrono::{DateTime, Utc};
use redb::ReadableTable;

use super::database::{AppDatabase, HEALTH_CHECKS};
use super::{HealthCheckStore, StorageResult};

/// A single recorded health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthRecord {
    /// Monotonic identifier, starting at 1.
    pub id: u64,
    pub check_happened_at: DateTime<Utc>,
}

impl HealthCheckStore for AppDatabase {
    fn record_check(&self, at: DateTime<Utc>) -> StorageResult<HealthRecord> {
        let write_txn = self.inner().begin_write()?;
        let id = {
            let mut table = write_txn.open_table(HEALTH_CHECKS)?;
            let next_id = match table.last()? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };
            table.insert(next_id, at.timestamp_millis())?;
            next_id
        };
        write_txn.commit()?;

        Ok(HealthRecord {
            id,
            check_happened_at: at,
        })
    }
}
