//! Init-db command - creates the users table

use clap::Args;
use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::database;

/// Arguments for the init-db command
#[derive(Args, Debug, Clone, Default)]
pub struct InitDbArgs {
    /// Store location, overrides database.url and DATABASE_URL
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create the schema if absent and exit
pub async fn run(args: InitDbArgs) -> anyhow::Result<()> {
    let mut config = super::load_config()?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    if config.database.backend == StorageBackend::Memory {
        info!("In-memory backend configured, nothing to initialize");
        return Ok(());
    }

    let pool = database::connect(&config.database).await?;
    database::ensure_schema(&pool).await?;
    pool.close().await;

    info!(url = %config.database.url, "Database initialized");

    Ok(())
}
