//! Record service entry-point: loads settings, opens the data directory and
//! serves the document, record and report endpoints.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recordkeeper::inbound::http::health::HealthState;
use recordkeeper::settings::ServiceSettings;
use server::{ServerConfig, create_server};

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

    let settings = ServiceSettings::load().wrap_err("failed to load settings")?;
    let config = ServerConfig::from_settings(&settings).wrap_err("invalid settings")?;
    info!(
        bind_addr = %config.bind_addr(),
        data_dir = %settings.data_dir(),
        "starting record service"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)
        .wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server failed")?;
    health_state.mark_unhealthy();
    Ok(())
}
