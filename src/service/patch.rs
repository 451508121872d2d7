// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Allow-listed profile updates.

use serde_json::{Map, Value};

/// Fields a user may change on their own account.
pub const UPDATABLE_FIELDS: [&str; 3] = ["first_name", "last_name", "password"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("Field '{0}' cannot be updated")]
    DisallowedField(String),

    #[error("Invalid JSON format")]
    InvalidValue,
}

/// Parsed profile update. `None` leaves the attribute unchanged.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Raw password, hashed by the service before it is stored.
    pub password: Option<String>,
}

impl std::fmt::Debug for ProfilePatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilePatch")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProfilePatch {
    /// Build a patch from a JSON object.
    ///
    /// Keys are checked in document order and the first one outside
    /// [`UPDATABLE_FIELDS`] is reported before any value is looked at.
    /// `null` counts as absent.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self, PatchError> {
        if let Some(field) = object
            .keys()
            .find(|key| !UPDATABLE_FIELDS.contains(&key.as_str()))
        {
            return Err(PatchError::DisallowedField(field.clone()));
        }

        Ok(Self {
            first_name: string_field(object, "first_name")?,
            last_name: string_field(object, "last_name")?,
            password: string_field(object, "password")?,
        })
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        [&self.first_name, &self.last_name, &self.password]
            .iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, PatchError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PatchError::InvalidValue),
    }
}
