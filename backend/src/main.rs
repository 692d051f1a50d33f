//! Backend entry-point: loads settings, applies migrations and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use profast::inbound::http::health::HealthState;
use profast::outbound::identity::IdentityToolkitProvider;
use profast::outbound::payments::StripeGateway;
use profast::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let database_url = settings.database_url()?.to_owned();
    let timeout = settings.outbound_timeout();

    run_pending_migrations(database_url.clone())
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let identity = IdentityToolkitProvider::new(
        settings.identity_endpoint()?,
        settings.identity_api_key()?,
        timeout,
    )
    .wrap_err("failed to build identity provider client")?;
    let gateway = StripeGateway::new(
        settings.payment_endpoint()?,
        settings.payment_secret_key()?,
        timeout,
    )
    .wrap_err("failed to build payment provider client")?;

    let config = ServerConfig::new(
        settings.bind_addr()?,
        pool.clone(),
        Arc::new(identity),
        Arc::new(gateway),
    )
    .with_intent_settings(settings.intent_settings()?)
    .with_admin_emails(settings.admin_emails()?);
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    let shutdown_health = health_state.clone();
    actix_web::rt::spawn(async move {
        if let Err(error) = shutdown_signal().await {
            warn!(%error, "failed to listen for shutdown signals; stopping");
        }
        shutdown_health.mark_unhealthy();
        info!("shutdown requested; draining connections");
        handle.stop(true).await;
    });
    info!(%bind_addr, "profast server listening");
    server.await?;

    pool.close();
    info!("profast server stopped");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
