//! # Database Migration Management
//!
//! Schema evolution using SQL migrations embedded in the binary and executed
//! automatically on application startup when auto_migrate is enabled.

use crate::errors::{InkpostError, Result};
use crate::storage::DbPool;
use sqlx::Row;
use tracing::{error, info};

/// Migrations embedded at compile time, ordered by version.
const MIGRATIONS: &[(i64, &str, &str)] =
    &[(1, "create_accounts", include_str!("../../migrations/0001_create_accounts.sql"))];

/// Run all pending database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Starting database migration process");

    create_migration_table(pool).await?;
    let applied = get_applied_migration_versions(pool).await?;

    let mut migrations_run = 0;
    for (version, description, sql) in MIGRATIONS {
        if applied.contains(version) {
            info!(version = version, "Migration already applied: {}", description);
            continue;
        }

        info!(version = version, "Running migration: {}", description);
        let start_time = std::time::Instant::now();

        let mut tx = pool.begin().await.map_err(|e| {
            InkpostError::database(e, "Failed to start migration transaction".to_string())
        })?;

        // raw_sql supports multi-statement migration files
        sqlx::raw_sql(sql).execute(&mut *tx).await.map_err(|e| {
            error!(error = %e, migration = description, "Migration failed");
            InkpostError::database(e, format!("Migration failed: {}", description))
        })?;

        let execution_time = start_time.elapsed().as_millis() as i64;

        sqlx::query(
            "INSERT INTO schema_migrations (version, description, execution_time, installed_on) VALUES ($1, $2, $3, $4)"
        )
        .bind(version)
        .bind(description)
        .bind(execution_time)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, migration = description, "Failed to record migration");
            InkpostError::database(e, format!("Failed to record migration: {}", description))
        })?;

        tx.commit().await.map_err(|e| {
            InkpostError::database(e, "Failed to commit migration transaction".to_string())
        })?;

        migrations_run += 1;
        info!(
            version = version,
            execution_time_ms = execution_time,
            "Migration completed: {}",
            description
        );
    }

    if migrations_run > 0 {
        info!(count = migrations_run, "Database migrations completed");
    } else {
        info!("No pending migrations");
    }

    Ok(())
}

/// Create the migration tracking table
async fn create_migration_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            execution_time BIGINT NOT NULL,
            installed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        InkpostError::database(e, "Failed to create migration tracking table".to_string())
    })?;

    Ok(())
}

/// Get list of applied migration versions
async fn get_applied_migration_versions(pool: &DbPool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .map_err(|e| InkpostError::database(e, "Failed to get applied migrations".to_string()))?;

    Ok(rows.into_iter().map(|row| row.get::<i64, _>("version")).collect())
}

/// Get the current migration version (highest applied)
pub async fn get_migration_version(pool: &DbPool) -> Result<i64> {
    let applied = get_applied_migration_versions(pool).await?;
    Ok(applied.into_iter().max().unwrap_or(0))
}
