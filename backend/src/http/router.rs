//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! panic recovery), and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::depthseries::{DEPTHSERIES_DOWNLOAD_PATH, DEPTHSERIES_PATH};
use crate::routes::timeseries::TIMESERIES_PATH;
use crate::routes::HEALTH_PATH;

/// Create the main application router with all routes and middleware.
///
/// No authentication layer is installed; every route is public.
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route(HEALTH_PATH, get(handlers::health_check))
        .route(TIMESERIES_PATH, get(handlers::get_timeseries))
        .route(DEPTHSERIES_PATH, get(handlers::get_depthseries))
        .route(DEPTHSERIES_DOWNLOAD_PATH, get(handlers::download_depthseries))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let router = if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
