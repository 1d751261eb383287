use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Internal randomness or algorithm failure while hashing.
    #[error("failed to hash password: {0}")]
    Hashing(String),
    /// The stored encoded hash could not be parsed. A wrong password is not
    /// an error; it is a normal `Ok(false)` from [`PasswordHasher::verify`].
    #[error("malformed password hash: {0}")]
    Verification(String),
}

/// One-way salted password hashing with a tunable cost factor.
///
/// Produces PHC-formatted strings carrying the algorithm tag, parameters and
/// salt, so verification recomputes with whatever cost the hash was created
/// under.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Fixed memory cost, 19 MiB per hash (OWASP recommended argon2id
    /// setting).
    const MEMORY_KIB: u32 = 19_456;

    /// Default time cost. Comparable work to bcrypt at work-factor 12.
    pub const DEFAULT_COST: u32 = 3;

    /// Creates a hasher with the given time cost (iterations). Costs below
    /// the algorithm minimum are raised to it.
    pub fn new(cost: u32) -> Self {
        let params = Params::new(Self::MEMORY_KIB, cost.max(Params::MIN_T_COST), 1, None)
            .unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC-formatted hash string.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Verifies a password against a stored PHC hash in constant time.
    ///
    /// A mismatch is `Ok(false)`; only a malformed `encoded` input is an
    /// error.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(encoded).map_err(|e| PasswordError::Verification(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hasher = PasswordHasher::default();
        let password = "test_password_123";

        let hash = hasher.hash(password).expect("should hash password");

        // Hash should not equal the original password
        assert_ne!(hash, password);

        // Hash should be in PHC format with the configured cost embedded
        assert!(hash.starts_with("$argon2id$"), "hash should be in PHC format");
        assert!(hash.contains("t=3"), "hash should carry the cost factor");
    }

    #[test]
    fn test_verification_success() {
        let hasher = PasswordHasher::default();
        let password = "secure_password_456";

        let hash = hasher.hash(password).expect("should hash password");
        let is_valid = hasher.verify(password, &hash).expect("should verify");

        assert!(is_valid, "correct password should verify successfully");
    }

    #[test]
    fn test_verification_mismatch_is_false_not_error() {
        let hasher = PasswordHasher::default();

        let hash = hasher.hash("correct_password").expect("should hash password");
        let is_valid = hasher.verify("wrong_password", &hash).expect("should verify");

        assert!(!is_valid, "wrong password should fail verification");
    }

    #[test]
    fn test_distinct_salts() {
        let hasher = PasswordHasher::default();
        let password = "same-password";

        let hash1 = hasher.hash(password).expect("should hash");
        let hash2 = hasher.hash(password).expect("should hash");

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);

        // Both should verify
        assert!(hasher.verify(password, &hash1).expect("should verify"));
        assert!(hasher.verify(password, &hash2).expect("should verify"));
    }

    #[test]
    fn test_malformed_encoded_is_error() {
        let hasher = PasswordHasher::default();

        let result = hasher.verify("password", "not-a-valid-hash");

        assert!(matches!(result, Err(PasswordError::Verification(_))));
    }

    #[test]
    fn test_cost_honored_on_verify() {
        // A hash created at one cost verifies under a hasher configured with
        // another: the parameters ride in the encoded string.
        let slow = PasswordHasher::new(4);
        let fast = PasswordHasher::new(1);

        let hash = slow.hash("portable-password").expect("should hash");

        assert!(fast.verify("portable-password", &hash).expect("should verify"));
    }
}
