use crate::auth::access::{evaluate, AccessRule, Decision};
use crate::auth::token::{DecodeError, TokenCodec};
use crate::types::{Principal, User};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Why a request failed authentication or authorization. The HTTP boundary
/// maps everything except `Forbidden` onto one uniform 401 so callers cannot
/// probe which step rejected them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header, or not bearer syntax.
    #[error("missing credentials")]
    MissingCredentials,
    /// The bearer token failed to decode.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] DecodeError),
    /// The token's subject has no current record in the identity store.
    #[error("unknown subject")]
    UnknownSubject,
    /// The stored role no longer matches the role embedded at issue time.
    #[error("token role no longer matches stored role")]
    StaleRole,
    /// Authenticated, but the access rule denied the operation.
    #[error("operation not permitted")]
    Forbidden,
}

/// Orchestrates token verification against the identity store and produces
/// the per-request [`Principal`].
pub struct AuthGateway {
    codec: Arc<TokenCodec>,
}

impl AuthGateway {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Authenticates a raw `Authorization` header value.
    ///
    /// `load_user` is the single collaborator call: it is invoked exactly
    /// once with the decoded subject id, and a `None` lookup is terminal for
    /// the request. No caching, no retry. If the loaded record's current
    /// role differs from the token's embedded role the token is stale:
    /// role changes after issuance invalidate outstanding tokens.
    pub async fn authenticate<F, Fut>(
        &self,
        authorization: Option<&str>,
        load_user: F,
    ) -> Result<Principal, AuthError>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: Future<Output = Option<User>>,
    {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        let claims = self.codec.decode(token)?;

        let subject = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken(DecodeError::Malformed))?;

        let user = load_user(subject).await.ok_or(AuthError::UnknownSubject)?;

        if user.role != claims.role {
            return Err(AuthError::StaleRole);
        }

        // The principal carries the *stored* identity, not the token's copy.
        Ok(Principal {
            id: user.id,
            role: user.role,
        })
    }

    /// Applies an access rule, translating a deny into [`AuthError::Forbidden`].
    pub fn authorize(
        &self,
        principal: &Principal,
        rule: &AccessRule,
        target_owner: Option<Uuid>,
    ) -> Result<(), AuthError> {
        match evaluate(principal, rule, target_owner) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AuthError::Forbidden),
        }
    }
}
