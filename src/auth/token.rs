use crate::types::{AccountStatus, AppError, Claims, Result, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

/// Why a token failed to decode. Callers map all three onto the same
/// external 401; the distinction exists for logging and for the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Structurally invalid, or missing a mandatory claim (`sub`, `role`).
    #[error("malformed token")]
    Malformed,
    /// Signature does not verify against the configured secret.
    #[error("bad signature")]
    BadSignature,
    /// Signature is fine but the expiry has passed.
    #[error("token expired")]
    Expired,
}

/// Creates and validates signed, expiring claims bundles.
///
/// HS256 over the serialized claims; the token string is opaque, URL-safe
/// and self-contained. Decoding is pure: no clock writes, no store lookups.
/// Whether the subject still exists (or still holds the embedded role) is
/// the gateway's job, layered on top.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the signing secret and token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing (should be at least 32 chars)
    /// * `ttl` - Access token validity
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is contractual; no grace window.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    /// The configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed token for the subject. Sets `iat` to now and `exp` to
    /// now + TTL; role and status serialize in their canonical uppercase
    /// form.
    pub fn issue(
        &self,
        subject: &str,
        role: Role,
        status: Option<AccountStatus>,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            status,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// A token missing `sub` or `role` is rejected as [`DecodeError::Malformed`]
    /// even under a valid signature; an absent `status` is tolerated.
    pub fn decode(&self, token: &str) -> std::result::Result<Claims, DecodeError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DecodeError::Expired,
                ErrorKind::InvalidSignature => DecodeError::BadSignature,
                _ => DecodeError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn create_test_codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::minutes(15))
    }

    /// Signs arbitrary claims with the test secret, bypassing the codec, to
    /// exercise decode against tokens the codec would never issue.
    fn sign_raw<T: Serialize>(claims: &T) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("should sign test claims")
    }

    #[test]
    fn test_round_trip() {
        let codec = create_test_codec();

        let token = codec
            .issue("user-123", Role::User, Some(AccountStatus::Standard))
            .expect("should issue token");
        let claims = codec.decode(&token).expect("should decode token");

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.status, Some(AccountStatus::Standard));
        assert_eq!(claims.exp, claims.iat + 15 * 60, "exp should be iat + ttl");
    }

    #[test]
    fn test_iat_is_now() {
        let codec = create_test_codec();

        let token = codec
            .issue("user-123", Role::Admin, None)
            .expect("should issue");
        let claims = codec.decode(&token).expect("should decode");

        let now = Utc::now().timestamp() as usize;
        assert!(
            claims.iat <= now && claims.iat >= now - 5,
            "iat should be current timestamp"
        );
    }

    #[test]
    fn test_expired_token() {
        // A codec with a negative TTL stamps expiries in the past.
        let expired_codec = TokenCodec::new(SECRET, Duration::seconds(-30));
        let codec = create_test_codec();

        let token = expired_codec
            .issue("user-123", Role::User, None)
            .expect("should issue");

        assert_eq!(codec.decode(&token), Err(DecodeError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let codec1 = create_test_codec();
        let codec2 = TokenCodec::new("another-secret-also-32-chars-long!!", Duration::minutes(15));

        let token = codec1
            .issue("user-123", Role::User, None)
            .expect("should issue");

        assert_eq!(codec2.decode(&token), Err(DecodeError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = create_test_codec();

        assert_eq!(codec.decode("not.a.token"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode(""), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_missing_role_is_malformed() {
        #[derive(Serialize)]
        struct NoRole {
            sub: String,
            iat: usize,
            exp: usize,
        }

        let codec = create_test_codec();
        let now = Utc::now().timestamp() as usize;
        let token = sign_raw(&NoRole {
            sub: "user-123".to_string(),
            iat: now,
            exp: now + 900,
        });

        // Signature is valid; the mandatory claim is not.
        assert_eq!(codec.decode(&token), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        #[derive(Serialize)]
        struct NoSub {
            role: String,
            iat: usize,
            exp: usize,
        }

        let codec = create_test_codec();
        let now = Utc::now().timestamp() as usize;
        let token = sign_raw(&NoSub {
            role: "USER".to_string(),
            iat: now,
            exp: now + 900,
        });

        assert_eq!(codec.decode(&token), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_absent_status_tolerated() {
        #[derive(Serialize)]
        struct NoStatus {
            sub: String,
            role: String,
            iat: usize,
            exp: usize,
        }

        let codec = create_test_codec();
        let now = Utc::now().timestamp() as usize;
        let token = sign_raw(&NoStatus {
            sub: "user-123".to_string(),
            role: "PROFESSIONAL".to_string(),
            iat: now,
            exp: now + 900,
        });

        let claims = codec.decode(&token).expect("should decode");
        assert_eq!(claims.role, Role::Professional);
        assert_eq!(claims.status, None);
        assert!(!claims.is_professional());
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        #[derive(Serialize)]
        struct OddRole {
            sub: String,
            role: String,
            iat: usize,
            exp: usize,
        }

        let codec = create_test_codec();
        let now = Utc::now().timestamp() as usize;
        let token = sign_raw(&OddRole {
            sub: "user-123".to_string(),
            role: "SUPERUSER".to_string(),
            iat: now,
            exp: now + 900,
        });

        // Never coerced into a known role.
        assert_eq!(codec.decode(&token), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_claims_helpers() {
        let codec = create_test_codec();

        let token = codec
            .issue("user-1", Role::Admin, Some(AccountStatus::Professional))
            .expect("should issue");
        let claims = codec.decode(&token).expect("should decode");

        assert!(claims.is_admin());
        assert!(claims.is_professional());
    }
}
