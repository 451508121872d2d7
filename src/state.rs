// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CredentialVerifier, RoutePolicy};
use crate::service::UserService;
use crate::storage::{AccountStore, AppDatabase, HealthCheckStore};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub health_checks: Arc<dyn HealthCheckStore>,
    pub policy: Arc<RoutePolicy>,
}

impl AppState {
    /// Both stores backed by the same redb database.
    pub fn new(db: Arc<AppDatabase>) -> Self {
        Self::from_stores(db.clone(), db, RoutePolicy::standard())
    }

    pub fn from_stores(
        accounts: Arc<dyn AccountStore>,
        health_checks: Arc<dyn HealthCheckStore>,
        policy: RoutePolicy,
    ) -> Self {
        Self {
            accounts,
            health_checks,
            policy: Arc::new(policy),
        }
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.accounts.clone())
    }

    pub fn verifier(&self) -> CredentialVerifier {
        CredentialVerifier::new(self.accounts.clone())
    }
}
