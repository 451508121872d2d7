// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account rows and their redb-backed store.

use chrono::{DateTime, Duration, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::database::{AppDatabase, ACCOUNTS, ACCOUNT_USERNAMES};
use super::{AccountStore, StorageError, StorageResult};
use crate::models::now_millis;

/// Account row as persisted.
///
/// Carries the password hash, so it is never serialized into a response;
/// see [`crate::models::AccountResponse`] for the public projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Email address, unique and immutable after creation.
    pub username: String,
    /// bcrypt digest.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Login is only allowed while this is set.
    pub verified: bool,
    pub account_created: DateTime<Utc>,
    pub account_updated: DateTime<Utc>,
}

impl Account {
    /// Build a fresh, verified account with a new id and both timestamps set
    /// to now.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            verified: true,
            account_created: now,
            account_updated: now,
        }
    }

    /// Advance `account_updated`.
    ///
    /// The new value is strictly greater than the previous one even when the
    /// clock has not moved by a full millisecond.
    pub fn touch(&mut self) {
        let now = now_millis();
        self.account_updated = if now > self.account_updated {
            now
        } else {
            self.account_updated + Duration::milliseconds(1)
        };
    }
}

impl AccountStore for AppDatabase {
    fn create(&self, account: &Account) -> StorageResult<()> {
        let json = serde_json::to_vec(account)?;
        let id = account.id.to_string();

        let write_txn = self.inner().begin_write()?;
        {
            let mut usernames = write_txn.open_table(ACCOUNT_USERNAMES)?;
            if usernames.get(account.username.as_str())?.is_some() {
                // Dropping the transaction without commit aborts it.
                return Err(StorageError::Conflict(format!(
                    "Account {}",
                    account.username
                )));
            }
            usernames.insert(account.username.as_str(), id.as_str())?;

            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            accounts.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>> {
        let read_txn = self.inner().begin_read()?;
        let usernames = read_txn.open_table(ACCOUNT_USERNAMES)?;
        let id = match usernames.get(username)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let accounts = read_txn.open_table(ACCOUNTS)?;
        match accounts.get(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>> {
        let read_txn = self.inner().begin_read()?;
        let accounts = read_txn.open_table(ACCOUNTS)?;
        let key = id.to_string();
        match accounts.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn update(&self, account: &Account) -> StorageResult<()> {
        let json = serde_json::to_vec(account)?;
        let id = account.id.to_string();

        let write_txn = self.inner().begin_write()?;
        {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            if accounts.get(id.as_str())?.is_none() {
                return Err(StorageError::NotFound(format!("Account {id}")));
            }
            accounts.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (AppDatabase, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = AppDatabase::open(&dir.path().join("accounts.redb")).expect("open database");
        (db, dir)
    }

    fn test_account(username: &str) -> Account {
        Account::new(username, "$2b$10$hash", "Jane", "Doe")
    }

    #[test]
    fn new_account_is_verified_with_equal_timestamps() {
        let account = test_account("jane@example.com");
        assert!(account.verified);
        assert_eq!(account.account_created, account.account_updated);
        assert_eq!(account.account_created.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn touch_strictly_advances_account_updated() {
        let mut account = test_account("jane@example.com");
        let mut previous = account.account_updated;
        for _ in 0..5 {
            account.touch();
            assert!(account.account_updated > previous);
            previous = account.account_updated;
        }
        assert!(account.account_updated > account.account_created);
    }

    #[test]
    fn touch_keeps_up_when_stamp_is_ahead_of_clock() {
        let mut account = test_account("jane@example.com");
        let future = Utc::now() + Duration::hours(1);
        account.account_updated = future;
        account.touch();
        assert_eq!(account.account_updated, future + Duration::milliseconds(1));
    }

    #[test]
    fn create_and_find_by_username_and_id() {
        let (db, _dir) = test_db();
        let account = test_account("jane@example.com");
        db.create(&account).unwrap();

        let by_name = db.find_by_username("jane@example.com").unwrap();
        assert_eq!(by_name.as_ref(), Some(&account));

        let by_id = db.find_by_id(account.id).unwrap();
        assert_eq!(by_id, Some(account));
    }

    #[test]
    fn username_lookup_is_exact() {
        let (db, _dir) = test_db();
        db.create(&test_account("jane@example.com")).unwrap();

        assert!(db.find_by_username("Jane@example.com").unwrap().is_none());
        assert!(db.find_by_username("jane@example.co").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_conflict_and_first_row_survives() {
        let (db, _dir) = test_db();
        let first = test_account("jane@example.com");
        db.create(&first).unwrap();

        let mut second = test_account("jane@example.com");
        second.first_name = "Other".to_string();
        let result = db.create(&second);
        assert!(matches!(result, Err(StorageError::Conflict(_))));

        let stored = db.find_by_username("jane@example.com").unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert!(db.find_by_id(second.id).unwrap().is_none());
    }

    #[test]
    fn update_overwrites_existing_row() {
        let (db, _dir) = test_db();
        let mut account = test_account("jane@example.com");
        db.create(&account).unwrap();

        account.first_name = "Janet".to_string();
        account.verified = false;
        account.touch();
        db.update(&account).unwrap();

        let stored = db.find_by_id(account.id).unwrap().unwrap();
        assert_eq!(stored.first_name, "Janet");
        assert!(!stored.verified);
        assert_eq!(stored.account_updated, account.account_updated);
    }

    #[test]
    fn update_missing_row_is_not_found() {
        let (db, _dir) = test_db();
        let result = db.update(&test_account("ghost@example.com"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn missing_lookups_return_none() {
        let (db, _dir) = test_db();
        assert!(db.find_by_username("nobody@example.com").unwrap().is_none());
        assert!(db.find_by_id(Uuid::new_v4()).unwrap().is_none());
    }
}
