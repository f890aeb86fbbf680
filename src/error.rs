//! Error types for Touchline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Session is no longer valid")]
    SessionInvalid,

    #[error("Insufficient permission")]
    Forbidden,

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("You cannot change the role of or delete your own account")]
    SelfActionDenied,

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'touchline init' first.")]
    ConfigNotFound,

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
