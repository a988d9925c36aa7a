//! Backend entry-point: loads settings, prepares the record store and serves
//! the onboarding REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use onboarding_backend::inbound::http::health::HealthState;
use onboarding_backend::outbound::persistence::{DbPool, run_pending_migrations};
use onboarding_backend::settings::AppSettings;

use server::{ServerConfig, StoreBackend, create_server};

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

    let settings = AppSettings::load().map_err(|e| eyre!("failed to load settings: {e}"))?;
    let bind_addr = settings.bind_addr()?;

    let store = match settings.pool_config() {
        Some(pool_config) => {
            if settings.run_migrations() {
                let applied = run_pending_migrations(pool_config.database_url())
                    .await
                    .wrap_err("applying database migrations")?;
                info!(applied, "database migrations up to date");
            }
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("creating database pool")?;
            StoreBackend::Postgres(pool)
        }
        None => {
            info!("no database configured; using the in-memory store");
            StoreBackend::Memory
        }
    };

    let config = ServerConfig::new(bind_addr, store)
        .with_extended_sequence(settings.extended_sequence());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, extended_sequence = settings.extended_sequence(), "server listening");
    server.await?;
    Ok(())
}
