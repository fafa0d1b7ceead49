//! Access token issuing and verification.
//!
//! Tokens are HS512-signed JWTs. The subject is the user name, which is
//! also the buyer id of the user's basket.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;
use crate::models::user::User;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing or verification failed (bad signature, expired, malformed).
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User name.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens with a shared HMAC key.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::days(config.ttl_days),
        }
    }

    /// Issue a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Jwt` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.user_name.clone(),
            email: user.email.to_string(),
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Jwt` for any invalid, expired or foreign token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::new(ALGORITHM))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::state::test_support::bob;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: SecretString::from(secret),
            ttl_days: 7,
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%");
        let token = tokens.issue(&bob()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.email, "bob@test.com");
        assert_eq!(claims.roles, vec!["Member"]);
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn test_foreign_key_rejected() {
        let token = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%")
            .issue(&bob())
            .unwrap();
        assert!(service("zZ9#qQ1!wW8@eE2$rR7%tT3^yY6&uU4*").verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%");
        let token = tokens
            .issue_at(&bob(), Utc::now() - Duration::days(30))
            .unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%").verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let output = format!("{:?}", service("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"));
        assert!(output.contains("[REDACTED]"));
    }
}
