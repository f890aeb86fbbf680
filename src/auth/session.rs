//! Session lifecycle management
//!
//! Orchestrates login, token resolution and logout over an injected
//! credential store. Resolution re-reads the store on every call, so a
//! logout, role change or deactivation takes effect on the very next
//! request - there is no in-process cache of session validity.

use std::sync::Arc;

use crate::auth::models::{AuthenticatedUser, Role, Session, SessionState, User};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenCodec;
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    session_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, auth: &AuthConfig) -> Self {
        Self {
            store,
            codec: TokenCodec::new(&auth.secret),
            session_ttl: chrono::Duration::days(auth.session_ttl_days),
            bcrypt_cost: auth.bcrypt_cost,
        }
    }

    /// Verify credentials and open a new session.
    ///
    /// Lookup is an exact match against the stored lowercase username;
    /// mixed-case input simply misses. Unknown username, inactive account
    /// and wrong password all surface as the same `InvalidCredentials`
    /// so responses carry no enumeration signal - the logs distinguish.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(AuthenticatedUser, String)> {
        let user = match self.store.find_user_by_username(username).await? {
            Some(user) if user.active => user,
            Some(_) => {
                tracing::debug!(username, "login rejected: account inactive");
                return Err(Error::InvalidCredentials);
            }
            None => {
                tracing::debug!(username, "login rejected: unknown username");
                return Err(Error::InvalidCredentials);
            }
        };

        // bcrypt is deliberately slow; keep it off the async workers
        let candidate = password.to_string();
        let hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&candidate, &hash)).await?;
        if !verified {
            tracing::debug!(username, "login rejected: password mismatch");
            return Err(Error::InvalidCredentials);
        }

        let session = Session::new(user.id.clone(), self.session_ttl);
        self.store.create_session(session.clone()).await?;
        self.store
            .update_last_login(&user.id, chrono::Utc::now())
            .await?;

        let token = self.codec.issue(&session.id, session.expires_at)?;
        tracing::info!(username = %user.username, "user logged in");
        Ok(((&user).into(), token))
    }

    /// Resolve a token to its authenticated user, or None.
    ///
    /// The stored session record is authoritative for expiry and
    /// revocation, independent of the token's own expiry claim. The user
    /// projection is read fresh from the store - never from the token -
    /// so role changes are visible immediately.
    pub async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>> {
        let claims = match self.codec.verify(token) {
            Some(claims) => claims,
            None => return Ok(None),
        };

        let session = match self.store.find_session(&claims.sid).await? {
            Some(session) => session,
            None => {
                tracing::debug!(sid = %claims.sid, "resolve failed: no such session");
                return Ok(None);
            }
        };

        let state = session.state_at(chrono::Utc::now());
        if state != SessionState::Active {
            tracing::debug!(sid = %session.id, ?state, "resolve failed: session not active");
            return Ok(None);
        }

        match self.store.find_user_by_id(&session.user_id).await? {
            Some(user) if user.active => Ok(Some((&user).into())),
            Some(user) => {
                tracing::debug!(username = %user.username, "resolve failed: account inactive");
                Ok(None)
            }
            None => {
                tracing::debug!(sid = %session.id, "resolve failed: owning user gone");
                Ok(None)
            }
        }
    }

    /// Session id embedded in a token, if the token verifies.
    ///
    /// Used by the logout path to find which session to revoke.
    pub fn session_id(&self, token: &str) -> Option<String> {
        self.codec.verify(token).map(|claims| claims.sid)
    }

    /// Revoke a session. Idempotent for already-revoked or unknown
    /// sessions; a store failure propagates rather than passing as
    /// success.
    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.store.revoke_session(session_id).await?;
        tracing::info!(sid = %session_id, "session revoked");
        Ok(())
    }

    /// Create a user with a hashed password.
    ///
    /// Accepts pre-validated input; only uniqueness is enforced here.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        let plaintext = password.to_string();
        let cost = self.bcrypt_cost;
        let hash =
            tokio::task::spawn_blocking(move || hash_password(&plaintext, cost)).await??;

        let user = User::new(username.to_string(), hash, role);
        match self.store.create_user(user).await? {
            Some(user) => {
                tracing::info!(username = %user.username, role = %user.role, "user created");
                Ok(user)
            }
            None => Err(Error::DuplicateUsername(username.to_string())),
        }
    }

    /// Change a user's role. Admins may not change their own.
    pub async fn update_role(
        &self,
        acting: &AuthenticatedUser,
        target_id: &str,
        role: Role,
    ) -> Result<User> {
        if acting.id == target_id {
            return Err(Error::SelfActionDenied);
        }
        if !self.store.update_role(target_id, role).await? {
            return Err(Error::UserNotFound(target_id.to_string()));
        }
        tracing::info!(target = %target_id, role = %role, "role updated");
        self.require_user(target_id).await
    }

    /// Activate or deactivate an account. Deactivation cuts off every
    /// live session of that user at its next resolve. Admins may not
    /// deactivate themselves.
    pub async fn set_active(
        &self,
        acting: &AuthenticatedUser,
        target_id: &str,
        active: bool,
    ) -> Result<User> {
        if acting.id == target_id {
            return Err(Error::SelfActionDenied);
        }
        if !self.store.set_active(target_id, active).await? {
            return Err(Error::UserNotFound(target_id.to_string()));
        }
        tracing::info!(target = %target_id, active, "active flag updated");
        self.require_user(target_id).await
    }

    /// Delete an account. Admins may not delete their own.
    pub async fn delete_user(&self, acting: &AuthenticatedUser, target_id: &str) -> Result<()> {
        if acting.id == target_id {
            return Err(Error::SelfActionDenied);
        }
        if !self.store.delete_user(target_id).await? {
            return Err(Error::UserNotFound(target_id.to_string()));
        }
        tracing::info!(target = %target_id, "user deleted");
        Ok(())
    }

    /// All users, newest first
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.store.list_users().await
    }

    async fn require_user(&self, id: &str) -> Result<User> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> SessionManager {
        let auth = AuthConfig {
            secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        SessionManager::new(Arc::new(MemoryStore::new()), &auth)
    }

    #[tokio::test]
    async fn test_login_resolve_logout_cycle() {
        let manager = manager();
        manager
            .create_user("alice", "secret1", Role::User)
            .await
            .unwrap();

        let (user, token) = manager.login("alice", "secret1").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::User);

        let resolved = manager.resolve(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        let sid = manager.session_id(&token).unwrap();
        manager.logout(&sid).await.unwrap();
        assert!(manager.resolve(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let manager = manager();
        manager
            .create_user("alice", "secret1", Role::User)
            .await
            .unwrap();

        let wrong_password = manager.login("alice", "wrongpass").await;
        let unknown_user = manager.login("ghost", "anything").await;

        assert!(matches!(wrong_password, Err(Error::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_updates_last_login() {
        let manager = manager();
        let created = manager
            .create_user("alice", "secret1", Role::User)
            .await
            .unwrap();
        assert!(created.last_login.is_none());

        manager.login("alice", "secret1").await.unwrap();
        let users = manager.list_users().await.unwrap();
        assert!(users[0].last_login.is_some());
    }
}
