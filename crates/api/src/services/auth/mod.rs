//! Authentication service.
//!
//! Provides password registration and login. Passwords are hashed with
//! Argon2id; tokens are issued by [`crate::services::token::TokenService`].

mod error;
pub mod validation;

pub use error::AuthError;
pub use validation::ValidationIssue;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{MEMBER_ROLE, User};

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with the `Member` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with every rule the input breaks,
    /// including duplicate user name or email.
    pub async fn register(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user_name = user_name.trim();
        let (email, mut issues) = validation::validate_registration(user_name, email, password);

        if !user_name.is_empty() && self.users.user_name_exists(user_name).await? {
            issues.insert(0, ValidationIssue::duplicate_user_name(user_name));
        }
        if let Some(email) = &email
            && self.users.email_exists(email).await?
        {
            issues.push(ValidationIssue::duplicate_email(email));
        }

        let Some(email) = email.filter(|_| issues.is_empty()) else {
            return Err(AuthError::Validation(issues));
        };

        let password_hash = hash_password(password)?;

        // A concurrent registration can still win the race to the unique index
        self.users
            .create(user_name, &email, &password_hash, &[MEMBER_ROLE])
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AuthError::Validation(vec![ValidationIssue::duplicate_user_name(user_name)])
                }
                other => AuthError::Repository(other),
            })
    }

    /// Login with user name and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the user name/password is wrong.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(user_name.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by user name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_name: &str) -> Result<User, AuthError> {
        self.users
            .get_by_user_name(user_name)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Pa$$w0rd").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Pa$$w0rd", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let hash = hash_password("Pa$$w0rd").unwrap();
        assert!(matches!(
            verify_password("pa$$w0rd", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("Pa$$w0rd", "plaintext"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("Pa$$w0rd").unwrap(), hash_password("Pa$$w0rd").unwrap());
    }
}
