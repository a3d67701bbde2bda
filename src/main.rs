use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use driver_desk::api;
use driver_desk::config::Config;
use driver_desk::error::AppError;
use driver_desk::seed;
use driver_desk::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let seed = seed::generate(
        &mut rand::rng(),
        Utc::now(),
        config.seed_active_orders,
        config.seed_completed_orders,
    );
    tracing::info!(
        orders = seed.orders.len(),
        vehicles = seed.vehicles.len(),
        remoocs = seed.remoocs.len(),
        "mock data generated"
    );

    let shared_state = Arc::new(AppState::new(
        seed,
        config.default_driver_id.clone(),
        config.event_buffer_size,
    ));

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        default_driver = %config.default_driver_id,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
