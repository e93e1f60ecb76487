//! CLI module for the user CRUD service
//!
//! - `serve`: run the HTTP server
//! - `init-db`: create the users table and exit

pub mod init_db;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// User CRUD Service - JSON API for managing users
#[derive(Parser)]
#[command(name = "user-crud-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Create the database schema and exit
    InitDb(init_db::InitDbArgs),
}

/// Load `.env` and layered configuration, then start logging
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
