use axum::{Json, Router, extract::DefaultBodyLimit, middleware::from_fn, routing::get};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

mod middleware;
mod routes;

pub mod error;
pub mod openapi;
pub mod state;

pub use axum;
pub use routes::{analyze::is_image_media_type, health::HealthResponse};

/// Room for multipart boundaries and part headers on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn construct_router(state: AppState) -> Router {
    let body_limit = state
        .limits
        .max_image_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::analyze::routes())
        .with_state(state)
        .route("/openapi.json", get(openapi_json))
        .layer(from_fn(middleware::error_reporting::error_reporting_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
