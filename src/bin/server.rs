use anyhow::Context;
use clap::Parser;
use trivia_api::config::Config;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file, overrides DB_PATH
    #[clap(long)]
    db_path: Option<String>,
    /// Address to listen on, overrides BIND_ADDR
    #[clap(long)]
    bind: Option<String>,
    /// Do not apply pending migrations on startup
    #[clap(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }
    if let Some(bind) = cli.bind {
        config = Config::new(config.db_path, &bind)?;
    }

    let pool = db::establish_connection(&config.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", config.db_path))?;

    if !cli.skip_migrations {
        tracing::info!("Running db migrations...");
        db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    run_server(pool, config.bind_addr).await
}
