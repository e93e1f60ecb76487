//! SQLite connection pool and schema bootstrap

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        email    TEXT NOT NULL
    )
"#;

/// Open a connection pool, creating the database file if it does not exist
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| {
            DomainError::configuration(format!("Invalid database URL '{}': {}", config.url, e))
        })?
        .create_if_missing(true);

    info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Connecting to database"
    );

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to database: {}", e)))
}

/// Create the users table if it is absent. There is no migration history.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DomainError> {
    sqlx::query(CREATE_USERS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create schema: {}", e)))?;

    info!("Database schema ready");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = test_support::memory_pool().await;
        ensure_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_configuration_error() {
        let config = DatabaseConfig {
            url: "sqlite://users.db?flavour=spicy".to_string(),
            ..DatabaseConfig::default()
        };

        let result = connect(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
