//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "touchline.toml";

/// Load configuration from touchline.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Reject configurations the server must not start with.
///
/// An unset token secret is fatal here rather than at first request time.
fn validate(config: &Config) -> Result<()> {
    if config.auth.secret.trim().is_empty() {
        return Err(Error::Config(
            "auth.secret must be set (e.g. via TOUCHLINE_SECRET)".to_string(),
        ));
    }
    if config.auth.session_ttl_days <= 0 {
        return Err(Error::Config(
            "auth.session_ttl_days must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Touchline Configuration

[server]
host = "0.0.0.0"
port = 4170

[auth]
# Secret for signing session tokens. The server refuses to start without it.
secret = "${TOUCHLINE_SECRET}"
session_ttl_days = 7
bcrypt_cost = 12
cookie_name = "touchline_token"

# PostgreSQL connection. Remove this section to run with the in-memory
# store (development only - users and sessions are lost on restart).
[database]
host = "localhost"
port = 5432
user = "postgres"
password = "${TOUCHLINE_DB_PASSWORD:-postgres}"
dbname = "touchline"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_interpolation() {
        env::set_var("TEST_VAR", "hello");
        let content = "value = \"${TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_load_rejects_empty_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[server]\nport = 4170\n\n[auth]\nsecret = \"\"\n"
        )
        .unwrap();

        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[auth]\nsecret = \"test-secret\"\nsession_ttl_days = 3\n"
        )
        .unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.auth.secret, "test-secret");
        assert_eq!(config.auth.session_ttl_days, 3);
        assert_eq!(config.server.port, 4170);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_load_rejects_nonpositive_ttl() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[auth]\nsecret = \"test-secret\"\nsession_ttl_days = 0\n"
        )
        .unwrap();

        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
