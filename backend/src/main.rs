//! Service entry-point: loads settings, prepares persistence, and serves the
//! REST API with its OpenAPI document.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use room_booker::inbound::http::health::HealthState;
use room_booker::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let mut config = ServerConfig::new(settings.bind_addr()).with_swagger_ui(settings.swagger_ui);
    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations {
                run_migrations(url).await.map_err(std::io::Error::other)?;
            }
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; data is kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "room booker listening");
    server.await
}
