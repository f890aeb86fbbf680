//! PostgreSQL credential store

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use crate::auth::models::{Role, Session, User};
use crate::config::DatabaseConfig;
use crate::error::Result;

use super::CredentialStore;

pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Connect to PostgreSQL and ensure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(&config.connection_string(), NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        let store = Self { client };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id            TEXT PRIMARY KEY,
                    username      TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    role          TEXT NOT NULL,
                    active        BOOLEAN NOT NULL DEFAULT TRUE,
                    last_login    TIMESTAMPTZ,
                    created_at    TIMESTAMPTZ NOT NULL
                );
                CREATE TABLE IF NOT EXISTS sessions (
                    id         TEXT PRIMARY KEY,
                    user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL,
                    expires_at TIMESTAMPTZ NOT NULL,
                    revoked    BOOLEAN NOT NULL DEFAULT FALSE
                );
                CREATE INDEX IF NOT EXISTS sessions_user_id_idx ON sessions (user_id);",
            )
            .await?;
        Ok(())
    }
}

fn row_to_user(row: &Row) -> Result<User> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role: role.parse()?,
        active: row.get("active"),
        last_login: row.get("last_login"),
        created_at: row.get("created_at"),
    })
}

fn row_to_session(row: &Row) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
        revoked: row.get("revoked"),
    }
}

#[async_trait]
impl CredentialStore for PostgresStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt("SELECT * FROM users WHERE username = $1", &[&username])
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let row = self
            .client
            .query_opt("SELECT * FROM users WHERE id = $1", &[&id])
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn create_user(&self, user: User) -> Result<Option<User>> {
        let result = self
            .client
            .execute(
                "INSERT INTO users (id, username, password_hash, role, active, last_login, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &user.id,
                    &user.username,
                    &user.password_hash,
                    &user.role.to_string(),
                    &user.active,
                    &user.last_login,
                    &user.created_at,
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(Some(user)),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<bool> {
        let updated = self
            .client
            .execute(
                "UPDATE users SET role = $2 WHERE id = $1",
                &[&id, &role.to_string()],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<bool> {
        let updated = self
            .client
            .execute(
                "UPDATE users SET active = $2 WHERE id = $1",
                &[&id, &active],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn update_last_login(
        &self,
        id: &str,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        self.client
            .execute(
                "UPDATE users SET last_login = $2 WHERE id = $1",
                &[&id, &at],
            )
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        let deleted = self
            .client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = self
            .client
            .query("SELECT * FROM users ORDER BY created_at DESC", &[])
            .await?;
        rows.iter().map(row_to_user).collect()
    }

    async fn create_session(&self, session: Session) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO sessions (id, user_id, created_at, expires_at, revoked)
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &session.id,
                    &session.user_id,
                    &session.created_at,
                    &session.expires_at,
                    &session.revoked,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<Session>> {
        let row = self
            .client
            .query_opt("SELECT * FROM sessions WHERE id = $1", &[&id])
            .await?;
        Ok(row.as_ref().map(row_to_session))
    }

    async fn revoke_session(&self, id: &str) -> Result<()> {
        // revoked only ever goes false -> true
        self.client
            .execute("UPDATE sessions SET revoked = TRUE WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }
}
