#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, routing::get};
use mangoscan::{Diagnoser, select_strategy};
use mangoscan_api::{construct_router, state::State};
use mangoscan_model_provider::load_classifier;
use std::sync::Arc;

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    metrics::init_telemetry()?;

    tracing::info!("Starting MangoScan diagnosis service");

    let config = config::Config::from_env()?;
    tracing::info!(
        port = config.port,
        min_confidence = config.min_confidence.value(),
        model_path = %config.model.model_path.display(),
        max_concurrent_inferences = config.limits.max_concurrent_inferences,
        "Loaded configuration"
    );

    let model = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || load_classifier(&model)).await?;
    let strategy = select_strategy(classifier);
    let diagnoser = Diagnoser::new(strategy, config.min_confidence);

    let state = Arc::new(State::new(diagnoser, config.limits));

    let app = Router::new()
        .merge(construct_router(state))
        .route("/metrics", get(metrics::handler));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
