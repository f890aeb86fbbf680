//! Credential storage
//!
//! The store is the single source of truth for users and sessions. Every
//! authorization decision re-reads it; nothing in the auth core caches
//! session or user state between requests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;

use crate::auth::models::{Role, Session, User};
use crate::error::Result;

/// Persistence operations the auth core depends on.
///
/// Injected into the session manager; concurrent writes are serialized by
/// the implementation, not by callers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact match against the stored (lowercase) username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a user. Returns None when the username is already taken.
    async fn create_user(&self, user: User) -> Result<Option<User>>;

    /// Returns false when no such user exists
    async fn update_role(&self, id: &str, role: Role) -> Result<bool>;

    /// Returns false when no such user exists
    async fn set_active(&self, id: &str, active: bool) -> Result<bool>;

    async fn update_last_login(
        &self,
        id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;

    /// Returns false when no such user exists
    async fn delete_user(&self, id: &str) -> Result<bool>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn create_session(&self, session: Session) -> Result<()>;

    async fn find_session(&self, id: &str) -> Result<Option<Session>>;

    /// Mark a session revoked. Idempotent: revoking an already-revoked or
    /// unknown session succeeds.
    async fn revoke_session(&self, id: &str) -> Result<()>;
}
