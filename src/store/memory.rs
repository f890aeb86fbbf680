//! In-memory credential store
//!
//! Backs tests and secret-only development runs. Nothing survives a
//! restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::models::{Role, Session, User};
use crate::error::Result;

use super::CredentialStore;

pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create_user(&self, user: User) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Ok(None);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(Some(user))
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_last_login(
        &self,
        id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        if let Some(user) = self.users.write().await.get_mut(id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        Ok(self.users.write().await.remove(id).is_some())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn create_session(&self, session: Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn revoke_session(&self, id: &str) -> Result<()> {
        if let Some(session) = self.sessions.write().await.get_mut(id) {
            session.revoked = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name.to_string(), "hash".to_string(), Role::User)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = MemoryStore::new();
        let created = store.create_user(user("alice")).await.unwrap().unwrap();

        let by_name = store.find_user_by_username("alice").await.unwrap();
        assert_eq!(by_name.unwrap().id, created.id);

        let by_id = store.find_user_by_id(&created.id).await.unwrap();
        assert_eq!(by_id.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_username_returns_none() {
        let store = MemoryStore::new();
        assert!(store.create_user(user("alice")).await.unwrap().is_some());
        assert!(store.create_user(user("alice")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_lookup_is_exact() {
        let store = MemoryStore::new();
        store.create_user(user("alice")).await.unwrap();
        // Stored form is lowercase; mixed-case lookup misses by design
        assert!(store
            .find_user_by_username("Alice")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_revoke_session_is_idempotent() {
        let store = MemoryStore::new();
        let session = Session::new("u1".to_string(), chrono::Duration::days(1));
        let id = session.id.clone();
        store.create_session(session).await.unwrap();

        store.revoke_session(&id).await.unwrap();
        store.revoke_session(&id).await.unwrap();
        store.revoke_session("missing").await.unwrap();

        assert!(store.find_session(&id).await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_list_users_newest_first() {
        let store = MemoryStore::new();
        let mut first = user("first");
        first.created_at = chrono::Utc::now() - chrono::Duration::hours(1);
        store.create_user(first).await.unwrap();
        store.create_user(user("second")).await.unwrap();

        let all = store.list_users().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "second");
        assert_eq!(all[1].username, "first");
    }

    #[tokio::test]
    async fn test_shared_state_across_clones() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.create_user(user("alice")).await.unwrap();
        assert!(clone
            .find_user_by_username("alice")
            .await
            .unwrap()
            .is_some());
    }
}
