//! Signed session tokens
//!
//! A token binds a session id to that session's expiry. The expiry lives
//! inside the signed payload, so tampering with either field breaks the
//! signature. Tokens carry no user data - role and username are always
//! re-read from the store when the token is resolved.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Claims embedded in a session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Session ID
    pub sid: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time, mirrors the session record's expiry
    pub exp: i64,
}

/// Issues and verifies session tokens, keyed by the process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the session record too; no clock-skew
        // allowance on the token claim itself.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for a session
    pub fn issue(
        &self,
        session_id: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<String> {
        let claims = Claims {
            sid: session_id.to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token and return its claims.
    ///
    /// Returns None on any malformed, tampered or expired token. Callers
    /// get no signal about which of those it was.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn test_issue_and_verify() {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
        let token = codec()
            .issue("session-1", expires_at)
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = codec().verify(&token).expect("Token should verify");
        assert_eq!(claims.sid, "session-1");
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expires_at = chrono::Utc::now() - chrono::Duration::seconds(5);
        let token = codec()
            .issue("session-1", expires_at)
            .expect("Failed to issue token");
        assert!(codec().verify(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
        let token = codec()
            .issue("session-1", expires_at)
            .expect("Failed to issue token");
        assert!(TokenCodec::new("other-secret").verify(&token).is_none());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(codec().verify("not-a-token").is_none());
        assert!(codec().verify("").is_none());
        assert!(codec().verify("a.b.c").is_none());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
        let token = codec()
            .issue("session-1", expires_at)
            .expect("Failed to issue token");

        // Flip one character in every position; no variant may verify
        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            if tampered == bytes {
                continue;
            }
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                codec().verify(&tampered).is_none(),
                "tampered byte {} verified",
                i
            );
        }
    }

    #[test]
    fn test_truncated_token_rejected() {
        let expires_at = chrono::Utc::now() + chrono::Duration::days(7);
        let token = codec()
            .issue("session-1", expires_at)
            .expect("Failed to issue token");
        assert!(codec().verify(&token[..token.len() - 1]).is_none());
    }
}
