// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. Response types
//! derive `Serialize` and `ToSchema`; request types derive `Deserialize` and
//! `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! ## Timestamps
//!
//! Every timestamp leaving the service is rendered as
//! `yyyy-MM-ddTHH:mm:ss.SSSZ` in UTC (see [`timestamp_format`]).

use std::sync::LazyLock;

use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::storage::Account;

// =============================================================================
// Timestamps
// =============================================================================

/// Current UTC time truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Serde helpers rendering `DateTime<Utc>` as `2026-01-31T12:00:00.000Z`.
pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }
}

// =============================================================================
// Account Models
// =============================================================================

/// Public projection of an account.
///
/// The password hash and the verification flag are never exposed.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct AccountResponse {
    /// Unique account identifier.
    pub id: Uuid,
    /// Email address used to log in.
    #[schema(example = "jane@example.com")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Creation time (UTC, millisecond precision).
    #[serde(serialize_with = "timestamp_format::serialize")]
    #[schema(value_type = String, example = "2026-01-31T12:00:00.000Z")]
    pub account_created: DateTime<Utc>,
    /// Time of the last successful update (UTC, millisecond precision).
    #[serde(serialize_with = "timestamp_format::serialize")]
    #[schema(value_type = String, example = "2026-01-31T12:00:00.000Z")]
    pub account_updated: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            account_created: account.account_created,
            account_updated: account.account_updated,
        }
    }
}

/// Registration payload.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported by [`CreateAccountRequest::validate`] rather than as malformed JSON.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateAccountRequest {
    /// Email address, used as the login name.
    #[schema(example = "jane@example.com")]
    pub username: Option<String>,
    /// At least 8 characters.
    #[schema(example = "longenough1")]
    pub password: Option<String>,
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

impl CreateAccountRequest {
    /// Check fields in declaration order and report the first violation.
    pub fn validate(self) -> Result<NewAccount, ApiError> {
        if is_blank(self.username.as_deref()) {
            return Err(ApiError::validation("username is required"));
        }
        let username = self.username.unwrap_or_default();
        if !EMAIL_PATTERN.is_match(&username) {
            return Err(ApiError::validation(
                "Username must be a valid email address",
            ));
        }

        let password = required(self.password, "password")?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::validation(
                "Password must be at least 8 characters",
            ));
        }

        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;

        Ok(NewAccount {
            username,
            password,
            first_name,
            last_name,
        })
    }
}

/// Profile update payload, for documentation.
///
/// The handler parses the raw body itself so that the first disallowed field
/// can be reported by name; see [`crate::service::ProfilePatch`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    #[schema(example = "Janet")]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_request() -> CreateAccountRequest {
        CreateAccountRequest {
            username: Some("jane@x.com".into()),
            password: Some("longenough1".into()),
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
        }
    }

    fn message_of(request: CreateAccountRequest) -> String {
        request.validate().unwrap_err().message
    }

    #[test]
    fn timestamp_format_has_millis_and_zulu_suffix() {
        let at = Utc.with_ymd_and_hms(2026, 1, 31, 12, 5, 9).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(
            at.format(timestamp_format::FORMAT).to_string(),
            "2026-01-31T12:05:09.042Z"
        );
    }

    #[test]
    fn now_millis_has_no_sub_millisecond_part() {
        assert_eq!(now_millis().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn account_response_omits_password_and_verified() {
        let account = Account::new("jane@x.com", "$2b$10$secret", "Jane", "Doe");
        let json = serde_json::to_value(AccountResponse::from(&account)).unwrap();
        let object = json.as_object().unwrap();

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "username",
                "first_name",
                "last_name",
                "account_created",
                "account_updated"
            ]
        );
        assert!(!json.to_string().contains("secret"));
        assert_eq!(object["id"], account.id.to_string());
    }

    #[test]
    fn valid_request_passes() {
        let account = valid_request().validate().unwrap();
        assert_eq!(account.username, "jane@x.com");
        assert_eq!(account.password, "longenough1");
    }

    #[test]
    fn missing_username_is_required() {
        let request = CreateAccountRequest {
            username: None,
            ..valid_request()
        };
        assert_eq!(message_of(request), "username is required");

        let request = CreateAccountRequest {
            username: Some("   ".into()),
            ..valid_request()
        };
        assert_eq!(message_of(request), "username is required");
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["jane", "jane@", "jane@x", "@x.com", "jane@x.c", "ja ne@x.com"] {
            let request = CreateAccountRequest {
                username: Some(bad.into()),
                ..valid_request()
            };
            assert_eq!(
                message_of(request),
                "Username must be a valid email address",
                "{bad}"
            );
        }
    }

    #[test]
    fn short_or_blank_password_is_rejected() {
        let request = CreateAccountRequest {
            password: Some("short".into()),
            ..valid_request()
        };
        assert_eq!(message_of(request), "Password must be at least 8 characters");

        let request = CreateAccountRequest {
            password: Some("".into()),
            ..valid_request()
        };
        assert_eq!(message_of(request), "password is required");
    }

    #[test]
    fn first_failing_field_is_reported() {
        let request = CreateAccountRequest {
            username: Some("not-an-email".into()),
            password: None,
            first_name: None,
            last_name: None,
        };
        assert_eq!(message_of(request), "Username must be a valid email address");

        let request = CreateAccountRequest {
            first_name: Some(" ".into()),
            last_name: None,
            ..valid_request()
        };
        assert_eq!(message_of(request), "first_name is required");

        let request = CreateAccountRequest {
            last_name: None,
            ..valid_request()
        };
        assert_eq!(message_of(request), "last_name is required");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request: CreateAccountRequest = serde_json::from_str(
            r#"{"username":"jane@x.com","password":"longenough1","first_name":"Jane","last_name":"Doe","verified":false,"id":"x"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
