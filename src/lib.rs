//! User CRUD Service
//!
//! A JSON-over-HTTP service for creating, reading, updating, deleting and
//! listing users. Every store operation is retried on transient failure
//! before an error reaches the client.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::StorageBackend;
use domain::UserRepository;
use infrastructure::database;
use infrastructure::user::{InMemoryUserRepository, SqliteUserRepository, UserService};
use tracing::info;

/// Create the application state with the configured repository
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository: Arc<dyn UserRepository> = match config.database.backend {
        StorageBackend::Sqlite => {
            let pool = database::connect(&config.database).await?;
            database::ensure_schema(&pool).await?;
            info!(url = %config.database.url, "Using SQLite user repository");
            Arc::new(SqliteUserRepository::new(pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory user repository");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let retry = config.retry_policy();
    info!(
        max_attempts = retry.max_attempts(),
        delay_ms = retry.delay().as_millis() as u64,
        "Store retry policy"
    );

    Ok(AppState::new(UserService::new(repository, retry)))
}
