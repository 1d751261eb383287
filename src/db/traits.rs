//! Identity store abstraction
//!
//! The `UserStore` trait is the seam between the auth core and whatever
//! holds user records. The core never assumes anything about persistence;
//! handlers read and write whole records through this trait and the gateway
//! receives its lookups as an injected call.

use crate::types::{Result, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persisted state for a pending profile-upgrade token. Only the digest of
/// the token is stored, never the token itself.
#[derive(Debug, Clone)]
pub struct UpgradeToken {
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

/// An opaque user-record store.
///
/// Lookups return `Option` - a missing record is a normal outcome, not an
/// error. Mutations validate (duplicate email, unknown id) and report
/// through the crate error type.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new record. Fails if the email is already taken.
    async fn create(&self, user: User) -> Result<()>;

    async fn get(&self, id: Uuid) -> Option<User>;

    /// Email comparison is case-insensitive.
    async fn get_by_email(&self, email: &str) -> Option<User>;

    /// Replaces an existing record. Fails if the id is unknown or the new
    /// email collides with another account.
    async fn update(&self, user: User) -> Result<()>;

    /// Removes a record and any pending upgrade token. Fails if unknown.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// All records, oldest first.
    async fn list(&self) -> Vec<User>;

    /// Stores (or replaces) the pending upgrade token for a user.
    async fn put_upgrade_token(&self, user_id: Uuid, token: UpgradeToken);

    async fn get_upgrade_token(&self, user_id: Uuid) -> Option<UpgradeToken>;

    async fn remove_upgrade_token(&self, user_id: Uuid);
}
