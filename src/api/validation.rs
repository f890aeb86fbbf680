//! Input validation for API requests
//!
//! Format checks live here at the boundary; the auth core only enforces
//! uniqueness and credential correctness.

use regex::Regex;

/// Validate a username: 3-20 characters, lowercase letters, digits and
/// underscore only
pub fn validate_username(username: &str) -> Result<(), String> {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"^[a-z0-9_]{3,20}$")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    if re.is_match(username) {
        Ok(())
    } else {
        Err(
            "Username must be 3-20 characters of lowercase letters, digits or underscores"
                .to_string(),
        )
    }
}

/// Validate a password for admin-created accounts
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["abc", "alice", "media_manager_2", "a1234567890123456789"] {
            assert!(validate_username(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_usernames() {
        for name in ["ab", "Alice", "with space", "dash-ed", "a_very_long_username_over_limit", ""] {
            assert!(validate_username(name).is_err(), "{} should be invalid", name);
        }
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }
}
