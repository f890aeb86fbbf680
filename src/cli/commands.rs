//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::api;
use crate::api::validation::{validate_password, validate_username};
use crate::auth::Role;
use crate::cli::{error, info, print_user_table, success, warn};
use crate::config;

/// Initialize a new touchline.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("touchline.toml");

    if config_path.exists() {
        warn("touchline.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created touchline.toml");
    info("Set TOUCHLINE_SECRET, then run 'touchline create-admin <username>' and 'touchline serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config()?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await?;

    Ok(())
}

/// Create an administrator account
pub async fn create_admin(username: &str) -> Result<()> {
    let config = config::load_config()?;

    if let Err(message) = validate_username(username) {
        error(&message);
        anyhow::bail!(message);
    }

    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    if let Err(message) = validate_password(&password) {
        error(&message);
        anyhow::bail!(message);
    }

    let state = api::build_state(config).await?;

    match state
        .sessions
        .create_user(username, &password, Role::Admin)
        .await
    {
        Ok(user) => {
            success(&format!("Created admin account '{}'", user.username));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create admin: {}", e));
            Err(e.into())
        }
    }
}

/// List user accounts
pub async fn users() -> Result<()> {
    let config = config::load_config()?;
    let state = api::build_state(config).await?;

    let users = state.sessions.list_users().await?;
    print_user_table(&users);

    Ok(())
}
