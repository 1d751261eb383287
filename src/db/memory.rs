//! In-memory identity store
//!
//! Backs the [`UserStore`] trait with plain maps behind `parking_lot` locks.
//! Records are ephemeral and lost on restart.

use crate::db::traits::{UpgradeToken, UserStore};
use crate::types::{AppError, Result, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    upgrade_tokens: RwLock<HashMap<Uuid, UpgradeToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: User) -> Result<()> {
        let mut users = self.users.write();

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::InvalidInput("User already exists".to_string()));
        }

        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    async fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    async fn update(&self, user: User) -> Result<()> {
        let mut users = self.users.write();

        if users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::InvalidInput("Email already in use".to_string()));
        }

        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(AppError::NotFound("User not found".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let removed = self.users.write().remove(&id);
        self.upgrade_tokens.write().remove(&id);

        removed
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    async fn put_upgrade_token(&self, user_id: Uuid, token: UpgradeToken) {
        self.upgrade_tokens.write().insert(user_id, token);
    }

    async fn get_upgrade_token(&self, user_id: Uuid) -> Option<UpgradeToken> {
        self.upgrade_tokens.read().get(&user_id).cloned()
    }

    async fn remove_upgrade_token(&self, user_id: Uuid) {
        self.upgrade_tokens.write().remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::{Duration, Utc};

    fn user(email: &str) -> User {
        User::new(email, "nick", "$argon2id$stub", Role::User)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryStore::new();
        let u = user("a@example.com");
        let id = u.id;

        store.create(u).await.expect("should create");

        assert!(store.get(id).await.is_some());
        assert!(store.get_by_email("a@example.com").await.is_some());
        assert!(store.get_by_email("A@EXAMPLE.COM").await.is_some());
        assert!(store.get_by_email("b@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create(user("a@example.com")).await.expect("first");

        let result = store.create(user("A@example.com")).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryStore::new();

        let result = store.update(user("ghost@example.com")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_email_collision() {
        let store = MemoryStore::new();
        let a = user("a@example.com");
        let mut b = user("b@example.com");
        store.create(a).await.expect("create a");
        store.create(b.clone()).await.expect("create b");

        b.email = "a@example.com".to_string();
        let result = store.update(b).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let u = user("a@example.com");
        let id = u.id;
        store.create(u).await.expect("create");

        store.delete(id).await.expect("should delete");

        assert!(store.get(id).await.is_none());
        assert!(matches!(
            store.delete(id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let store = MemoryStore::new();
        let mut first = user("first@example.com");
        let mut second = user("second@example.com");
        first.created_at = Utc::now() - Duration::minutes(10);
        second.created_at = Utc::now();
        store.create(second).await.expect("create");
        store.create(first).await.expect("create");

        let listed = store.list().await;

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].email, "first@example.com");
    }

    #[tokio::test]
    async fn test_upgrade_token_lifecycle() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let token = UpgradeToken {
            digest: "abc123".to_string(),
            expires_at: Utc::now() + Duration::hours(24),
        };

        assert!(store.get_upgrade_token(user_id).await.is_none());

        store.put_upgrade_token(user_id, token).await;
        assert_eq!(
            store.get_upgrade_token(user_id).await.map(|t| t.digest),
            Some("abc123".to_string())
        );

        store.remove_upgrade_token(user_id).await;
        assert!(store.get_upgrade_token(user_id).await.is_none());
    }
}
