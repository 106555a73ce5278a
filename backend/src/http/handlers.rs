//! HTTP handlers for the REST API.
//!
//! Each handler validates its query string, builds a filter descriptor and
//! delegates to the service layer.

use std::any::Any;
use std::collections::HashMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{DepthseriesRecord, HealthResponse, TimeseriesRecord};
use super::error::AppError;
use super::state::AppState;
use crate::api::DepthseriesFilter;
use crate::db::services as db_services;
use crate::routes::{depthseries, timeseries, ROUTE_PATTERNS};
use crate::services::csv_export::{self, CSV_CONTENT_TYPE};
use crate::services::route_match::{closest_match, SUGGESTION_CUTOFF};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Decoded query string, or the reason axum could not decode it.
pub type RawQuery = Result<Query<HashMap<String, String>>, QueryRejection>;

fn query_map(query: RawQuery) -> Result<HashMap<String, String>, AppError> {
    query
        .map(|Query(map)| map)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Measurements
// =============================================================================

/// GET /api/v1/timeseries?start_date&end_date
pub async fn get_timeseries(
    State(state): State<AppState>,
    query: RawQuery,
) -> HandlerResult<Vec<TimeseriesRecord>> {
    let filter = timeseries::build_filter(&query_map(query)?)?;
    let rows = db_services::list_timeseries(state.repository.as_ref(), &filter).await?;
    Ok(Json(rows))
}

/// GET /api/v1/depthseries
pub async fn get_depthseries(State(state): State<AppState>) -> HandlerResult<Vec<DepthseriesRecord>> {
    let rows =
        db_services::list_depthseries(state.repository.as_ref(), &DepthseriesFilter::default())
            .await?;
    Ok(Json(rows))
}

/// GET /api/v1/depthseries/download?min_depth&max_depth
///
/// Streams the filtered rows back as a CSV attachment.
pub async fn download_depthseries(
    State(state): State<AppState>,
    query: RawQuery,
) -> Result<Response, AppError> {
    let filter = depthseries::build_download_filter(&query_map(query)?)?;
    let rows = db_services::list_depthseries(state.repository.as_ref(), &filter).await?;
    let body = csv_export::depthseries_to_csv(&rows)?;

    let headers = [
        (header::CONTENT_TYPE, format!("{}; charset=utf-8", CSV_CONTENT_TYPE)),
        (header::CONTENT_DISPOSITION, csv_export::content_disposition()),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}

// =============================================================================
// Fallbacks
// =============================================================================

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found(uri: Uri) -> AppError {
    let path = uri.path();
    let suggestion = closest_match(path, ROUTE_PATTERNS.iter().copied(), SUGGESTION_CUTOFF);
    tracing::info!(path, suggestion, "No route matched");

    AppError::NotFound {
        suggestion: suggestion.map(str::to_string),
    }
}

/// Panic hook for `CatchPanicLayer`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Unexpected(detail).into_response()
}
