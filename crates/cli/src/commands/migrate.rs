//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at build
//! time.

use sqlx::PgPool;

use super::CommandError;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CommandError::Migration` if a migration fails.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}
