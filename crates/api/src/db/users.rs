//! User repository for database operations.
//!
//! User names and emails are unique case-insensitively; every lookup here
//! compares with `lower(..)` to match the unique indexes.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use restore_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

#[derive(Debug, FromRow)]
struct UserRow {
    id: UserId,
    user_name: String,
    email: String,
    password_hash: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            User {
                id: self.id,
                user_name: self.user_name,
                email,
                roles: self.roles,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by user name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .get_with_password_hash(user_name)
            .await?
            .map(|(user, _)| user))
    }

    /// Get a user and their password hash by user name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_with_password_hash(
        &self,
        user_name: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT u.id, u.user_name, u.email, u.password_hash, u.created_at,
                   COALESCE(
                       array_agg(r.role ORDER BY r.role) FILTER (WHERE r.role IS NOT NULL),
                       '{}'
                   ) AS roles
            FROM app_user u
            LEFT JOIN user_role r ON r.user_id = u.id
            WHERE lower(u.user_name) = lower($1)
            GROUP BY u.id
            ",
        )
        .bind(user_name)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Whether a user with this name exists (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn user_name_exists(&self, user_name: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM app_user WHERE lower(user_name) = lower($1))",
        )
        .bind(user_name)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Whether a user with this email exists (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM app_user WHERE lower(email) = $1)",
        )
        .bind(email.normalized())
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a user with a password hash and roles in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user name or email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_name: &str,
        email: &Email,
        password_hash: &str,
        roles: &[&str],
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (UserId, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO app_user (user_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            ",
        )
        .bind(user_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| super::conflict_on_unique(e, "user"))?;

        let mut roles: Vec<String> = roles.iter().map(|r| (*r).to_owned()).collect();
        roles.sort();
        roles.dedup();

        sqlx::query(
            r"
            INSERT INTO user_role (user_id, role)
            SELECT $1, role FROM UNNEST($2::text[]) AS role
            ",
        )
        .bind(id)
        .bind(&roles)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(User {
            id,
            user_name: user_name.to_owned(),
            email: email.clone(),
            roles,
            created_at,
        })
    }
}
