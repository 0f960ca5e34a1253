//! PostgreSQL pool setup and startup checks for the allow-listed tables.

use crate::config::ServiceConfig;
use crate::error::AppError;
use crate::guard::TableGuard;
use crate::sql::qualified_table;
use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn connect(config: &ServiceConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Returns the allow-listed tables the database does not know. Missing tables are
/// logged, not fatal: requests for them fail with an internal error until they exist.
pub async fn missing_tables(pool: &PgPool, guard: &TableGuard) -> Result<Vec<String>, AppError> {
    let mut missing = Vec::new();
    for table in guard.tables() {
        let exists: (bool,) = sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
            .bind(qualified_table(table))
            .fetch_one(pool)
            .await?;
        if !exists.0 {
            tracing::warn!(table, "allow-listed table does not exist");
            missing.push(table.to_string());
        }
    }
    missing.sort();
    Ok(missing)
}
