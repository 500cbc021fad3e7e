//! JWT validation for inbound requests. Tokens are minted by the external
//! identity service; this side only needs to verify and read them.

use crate::auth::models::{Claims, Role};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

pub struct JwtHandler {
    secret: String,
}

impl JwtHandler {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Validate a token and extract its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        debug!("Validated JWT for user {}", decoded.claims.username);

        Ok(decoded.claims)
    }

    /// Mint a token. Used by tests and local tooling; production tokens come
    /// from the identity service signing with the same secret.
    pub fn issue_token(&self, sub: &str, username: &str, role: Role) -> Result<String> {
        let exp = Utc::now()
            .checked_add_signed(chrono::Duration::hours(24))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: sub.to_string(),
            username: username.to_string(),
            role,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate JWT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let token = handler.issue_token("42", "captain", Role::Player).unwrap();

        let claims = handler.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "captain");
        assert_eq!(claims.role, Role::Player);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        assert!(handler.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1".to_string());
        let handler2 = JwtHandler::new("secret2".to_string());

        let token = handler1.issue_token("1", "admin", Role::Admin).unwrap();
        assert!(handler2.validate_token(&token).is_err());
    }
}
