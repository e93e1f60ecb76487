use clap::Parser;
use user_crud_service::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::InitDb(args) => cli::init_db::run(args).await,
    }
}
