use clap::Parser;
use tracing_subscriber::EnvFilter;

use hh_loader::config::Config;
use hh_loader::hh::HhClient;
use hh_loader::{db, ingest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hh_loader=info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;

    let client = HhClient::new(&config.hh_base_url)?;
    let employers = config.resolved_employers();

    ingest::run(&pool, &client, &employers).await?;
    ingest::print_reports(&pool, &config.keyword).await?;

    pool.close().await;
    Ok(())
}
