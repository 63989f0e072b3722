//! Backend entry-point: loads settings, wires the word store and translation
//! provider, and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use wordbook::config::ServerSettings;
use wordbook::inbound::http::health::HealthState;
use wordbook::outbound::gemini::GeminiTranslationProvider;
use wordbook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|error| eyre!("failed to load configuration: {error}"))?;

    let provider = GeminiTranslationProvider::new(
        settings.gemini_endpoint()?,
        settings.gemini_api_key()?,
        settings.gemini_model(),
        settings.provider_timeout(),
    )
    .wrap_err("failed to build the Gemini client")?;
    info!(url = %provider.url(), "translation provider configured");

    let mut config = ServerConfig::new(settings.bind_addr()?, Arc::new(provider))
        .with_provider_timeout(settings.provider_timeout());

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to migrate the word store")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to connect to the word store")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err("failed to start the HTTP server")?;
    info!(addr = %settings.bind_addr()?, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("HTTP server failed")
}
