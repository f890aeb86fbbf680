//! Password hashing

use crate::error::Result;

/// Hash a password with bcrypt at the given cost factor.
///
/// The output embeds its own salt, so hashing the same password twice
/// yields different strings.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Verify a password against a stored hash.
///
/// A malformed hash verifies as false rather than erroring, so a corrupt
/// row behaves like a wrong password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost, to keep tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1", TEST_COST).expect("Failed to hash");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("secret1", TEST_COST).expect("Failed to hash");
        let b = hash_password("secret1", TEST_COST).expect("Failed to hash");
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("secret1", "not-a-bcrypt-hash"));
        assert!(!verify_password("secret1", ""));
    }
}
