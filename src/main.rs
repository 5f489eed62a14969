use anyhow::Context;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use ticket_assistant::core::config::AppConfig;
use ticket_assistant::core::shared::state::AppState;
use ticket_assistant::core::shared::utils::{create_conn, run_migrations};
use ticket_assistant::main_module::run_axum_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env().context("Failed to load config from env")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    info!(
        "Starting ticket-assistant {} (debug: {})",
        env!("CARGO_PKG_VERSION"),
        config.server.debug
    );
    info!("Using database {}", config.database.url);

    let pool = create_conn(&config.database.url, config.database.pool_size)
        .context("Failed to create database pool")?;
    run_migrations(&pool).map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;

    let state = Arc::new(AppState::new(pool, config)?);
    run_axum_server(state).await?;

    info!("Server stopped");
    Ok(())
}
