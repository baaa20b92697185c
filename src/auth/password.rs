use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::StoreError;

/// Hash a plaintext password into a salted, self-describing PHC digest.
///
/// The plaintext is never logged or persisted.
pub fn hash_password(plain: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    let digest = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| StoreError::Hash(e.to_string()))?
        .to_string();

    Ok(digest)
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed stored digest counts as a verification failure, not a fault:
/// the caller must see "credentials invalid", never a server error.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_succeeds_with_correct_password() {
        let digest = hash_password("correctpass").expect("hashing failed");
        assert!(verify_password("correctpass", &digest));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let digest = hash_password("correctpass").expect("hashing failed");
        assert!(!verify_password("wrongpass", &digest));
    }

    #[test]
    fn test_digest_is_salted_and_self_describing() {
        let a = hash_password("samepassword").expect("hashing failed");
        let b = hash_password("samepassword").expect("hashing failed");

        // Random salt makes two digests of the same password differ
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
    }

    #[test]
    fn test_digest_never_contains_plaintext() {
        let digest = hash_password("mysecretpassword").expect("hashing failed");
        assert!(!digest.contains("mysecretpassword"));
    }

    #[test]
    fn test_malformed_digest_is_a_verification_failure_not_a_crash() {
        assert!(!verify_password("anything", "not-a-phc-digest"));
        assert!(!verify_password("anything", ""));
    }
}
