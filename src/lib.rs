// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account Server - User Account REST Service
//!
//! Registers accounts, authenticates callers with HTTP Basic credentials,
//! lets a user read and update their own profile and exposes a liveness check
//! backed by a database write.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Basic authentication gate and credential verification
//! - `service` - Registration and profile updates
//! - `storage` - Embedded redb persistence

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;
