// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification (bcrypt).

/// bcrypt cost factor.
pub const HASH_COST: u32 = 10;

/// Password hashing failure.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Hash a raw password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Check a raw password against a stored digest.
///
/// A digest bcrypt cannot parse never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("longenough1").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("longenough1", &hash));
        assert!(!verify_password("longenough2", &hash));
    }

    #[test]
    fn salt_differs_per_call() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same-password", &first));
        assert!(verify_password("same-password", &second));
    }

    #[test]
    fn hash_does_not_contain_raw_password() {
        let hash = hash_password("longenough1").unwrap();
        assert!(!hash.contains("longenough1"));
    }

    #[test]
    fn malformed_digest_never_matches() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
