//! Authentication models

use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrator - full access
    Admin,
    /// Can curate media in addition to viewing
    MediaManager,
    /// Regular user - read-only access
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::MediaManager => write!(f, "media_manager"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "media_manager" => Ok(Role::MediaManager),
            "user" => Ok(Role::User),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Username for login, stored lowercase
    pub username: String,
    /// bcrypt hash of the password, never sent to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User's role
    pub role: Role,
    /// Whether the account is active
    pub active: bool,
    /// Last successful login
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(username: String, password_hash: String, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            active: true,
            last_login: None,
            created_at: chrono::Utc::now(),
        }
    }
}

/// One authenticated login, held server-side and independently revocable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session ID - random, never derived from user input
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the session stops being valid
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Set on logout; never cleared once set
    pub revoked: bool,
}

/// Session lifecycle states. Expired and Revoked are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
    Revoked,
}

impl Session {
    /// Create a new session for a user, valid for `ttl` from now
    pub fn new(user_id: String, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: generate_session_id(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        }
    }

    /// State of this session at the given instant.
    ///
    /// A session whose expiry equals `now` is already expired.
    pub fn state_at(&self, now: chrono::DateTime<chrono::Utc>) -> SessionState {
        if self.revoked {
            SessionState::Revoked
        } else if now >= self.expires_at {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }
}

/// Generate an unguessable session identifier
fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// The minimal projection handed to authorization checks and callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information in responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
    pub active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.to_string(),
            active: user.active,
            last_login: user.last_login,
            created_at: Some(user.created_at),
        }
    }
}

impl From<&AuthenticatedUser> for UserInfo {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.to_string(),
            active: true,
            last_login: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::MediaManager, Role::User] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(Error::UnknownRole(_))
        ));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new("u1".to_string(), chrono::Duration::days(7));
        let b = Session::new("u1".to_string(), chrono::Duration::days(7));
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 64);
    }

    #[test]
    fn test_session_state_boundaries() {
        let session = Session::new("u1".to_string(), chrono::Duration::days(7));

        assert_eq!(session.state_at(session.created_at), SessionState::Active);
        // Expiry instant itself is no longer valid
        assert_eq!(session.state_at(session.expires_at), SessionState::Expired);
        assert_eq!(
            session.state_at(session.expires_at - chrono::Duration::seconds(1)),
            SessionState::Active
        );

        let mut revoked = session.clone();
        revoked.revoked = true;
        assert_eq!(revoked.state_at(revoked.created_at), SessionState::Revoked);
        // Revocation wins over expiry
        assert_eq!(revoked.state_at(revoked.expires_at), SessionState::Revoked);
    }
}
