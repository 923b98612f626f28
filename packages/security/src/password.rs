// ABOUTME: Argon2id password hashing in PHC string format
// ABOUTME: Hashes are self-describing, so parameters can change without a migration

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;

use crate::error::{SecurityError, SecurityResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_password(password: &str) -> SecurityResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SecurityError::InvalidInput {
            field: "password",
            message: format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        });
    }
    Ok(())
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> SecurityResult<String> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| SecurityError::Hashing(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SecurityError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Spend the same effort as a real verification when there is nothing to
/// verify against, so an unknown username is not faster to reject.
pub fn dummy_verify(password: &str) {
    let _ = hash_password(password);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("rahasia-sekali").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("rahasia-sekali", &hash));
        assert!(!verify_password("rahasia-salah", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("rahasia-sekali").unwrap();
        let second = hash_password("rahasia-sekali").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_password_length_rule() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }
}
