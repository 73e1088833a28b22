use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use tracing::warn;

use super::error::AuthError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password using Argon2 with a fresh random salt embedded in the digest
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Verify a password against a stored digest using constant-time comparison.
///
/// A mismatch is `false`, never an error. An unparsable digest is also `false`.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Validate the only password policy enforced: minimum length
pub fn validate_password_length(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "secret1";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(&hash, password));
        assert!(!verify_password(&hash, "wrong_password"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "secret1";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different hashes due to different salts
        assert_ne!(hash1, hash2);

        assert!(verify_password(&hash1, password));
        assert!(verify_password(&hash2, password));
    }

    #[test]
    fn test_garbage_hash_is_a_mismatch() {
        assert!(!verify_password("not-a-phc-string", "secret1"));
        assert!(!verify_password("", "secret1"));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password_length("secret").is_ok());
        assert!(validate_password_length("longer password").is_ok());

        assert!(matches!(
            validate_password_length("short"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(validate_password_length("").is_err());
    }
}
