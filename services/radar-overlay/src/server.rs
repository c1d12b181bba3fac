//! HTTP API for the published overlay.
//!
//! Provides endpoints for:
//! - The current overlay as base64 PNG plus bounds
//! - Resolving the newest file in an MRMS directory listing
//! - One-shot TIFF to PNG conversion
//! - Service status, health and Prometheus metrics

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::SecondsFormat;
use metrics_exporter_prometheus::PrometheusHandle;
use radar_common::{GeoBounds, RadarError};
use raster_decoder::{decode, decompress_gzip};
use renderer::{composite, encode_bitmap, ColorRamp};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::fetch::SourceFetcher;
use crate::listing::candidate_links;
use crate::metrics::{CycleStats, CycleStatsSnapshot};
use crate::overlay::LayerStack;

const NO_STORE: (header::HeaderName, &str) = (header::CACHE_CONTROL, "no-store");

/// Shared state for all handlers.
pub struct ServerState {
    pub region_id: String,
    pub title: String,
    pub opacity: f64,
    pub stack: Arc<LayerStack>,
    pub stats: Arc<CycleStats>,
    /// Used for listing and conversion requests.
    pub fetcher: Arc<dyn SourceFetcher>,
    pub ramp: Arc<ColorRamp>,
    pub prometheus: Option<PrometheusHandle>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResponse {
    pub message: &'static str,
    pub image_base64: String,
    pub bounds: GeoBounds,
    pub timestamp: String,
    pub opacity: f64,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct FirstResponse {
    pub first: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub region: String,
    pub title: String,
    pub last_updated: Option<String>,
    pub sequence: Option<u64>,
    pub fallback: Option<bool>,
    pub layers: usize,
    pub cycles: CycleStatsSnapshot,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FirstQuery {
    pub base: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub url: Option<String>,
    /// Defaults to true when the URL ends in `.gz`.
    pub gzip: Option<bool>,
}

// ============================================================================
// Errors
// ============================================================================

/// `RadarError` rendered as `{ "error": ... }` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub RadarError);

impl From<RadarError> for ApiError {
    fn from(err: RadarError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (
            status,
            [NO_STORE],
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Router
// ============================================================================

/// Create the API router.
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/radar/latest", get(latest_handler))
        .route("/api/mrms/first", get(first_handler))
        .route("/api/convert/tiff-to-png", get(convert_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/radar/latest - Current overlay
async fn latest_handler(Extension(state): Extension<Arc<ServerState>>) -> ApiResult<Response> {
    let overlay = state.stack.current().ok_or(RadarError::NotReady)?;

    let body = LatestResponse {
        message: "Radar image generated successfully",
        image_base64: STANDARD.encode(&overlay.image_png),
        bounds: overlay.bounds,
        timestamp: overlay.fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        opacity: state.opacity,
        fallback: overlay.fallback,
    };
    Ok(([NO_STORE], Json(body)).into_response())
}

/// GET /api/mrms/first?base=<url> - Newest raster file in a directory listing
async fn first_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Query(params): Query<FirstQuery>,
) -> ApiResult<Response> {
    let base = required(params.base, "base")?;
    let base_url = parse_url(&base, "base")?;

    let html = state.fetcher.fetch(&base).await.map_err(|e| RadarError::Upstream {
        url: base.clone(),
        message: e.to_string(),
    })?;
    let html = String::from_utf8_lossy(&html);

    let links = candidate_links(&html, &base_url);
    debug!(base = %base, candidates = links.len(), "Resolved directory listing");
    let first = links.into_iter().next().ok_or(RadarError::NoFilesFound)?;

    Ok(([NO_STORE], Json(FirstResponse { first: first.to_string() })).into_response())
}

/// GET /api/convert/tiff-to-png?url=<url>[&gzip=true] - One-shot conversion
async fn convert_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Query(params): Query<ConvertQuery>,
) -> ApiResult<Response> {
    let url = required(params.url, "url")?;
    parse_url(&url, "url")?;
    let gzip = params
        .gzip
        .unwrap_or_else(|| url.to_ascii_lowercase().ends_with(".gz"));

    let data = state.fetcher.fetch(&url).await.map_err(|e| RadarError::Upstream {
        url: url.clone(),
        message: e.to_string(),
    })?;

    let ramp = state.ramp.clone();
    let png = tokio::task::spawn_blocking(move || convert(&data, gzip, &ramp))
        .await
        .map_err(|e| RadarError::Internal(e.to_string()))??;

    info!(url = %url, bytes = png.len(), "Converted raster to PNG");
    Ok((
        [(header::CONTENT_TYPE, "image/png"), NO_STORE],
        Bytes::from(png),
    )
        .into_response())
}

/// GET /status - Overlay and cycle status
async fn status_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    let current = state.stack.current();

    Json(StatusResponse {
        region: state.region_id.clone(),
        title: state.title.clone(),
        last_updated: current
            .as_ref()
            .map(|o| o.fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        sequence: current.as_ref().map(|o| o.sequence),
        fallback: current.as_ref().map(|o| o.fallback),
        layers: state.stack.len(),
        cycles: state.stats.snapshot(),
    })
}

/// GET /health - Health check endpoint
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "radar-overlay"
    }))
}

/// GET /metrics - Prometheus exposition
async fn metrics_handler(Extension(state): Extension<Arc<ServerState>>) -> Response {
    match &state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn required(value: Option<String>, name: &str) -> Result<String, RadarError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RadarError::MissingParameter(name.to_string()))
}

fn parse_url(value: &str, param: &str) -> Result<Url, RadarError> {
    Url::parse(value).map_err(|e| RadarError::InvalidParameter {
        param: param.to_string(),
        message: e.to_string(),
    })
}

fn convert(data: &[u8], gzip: bool, ramp: &ColorRamp) -> Result<Vec<u8>, RadarError> {
    let raw = if gzip {
        decompress_gzip(data).map_err(|e| RadarError::Decompression(e.to_string()))?
    } else {
        Bytes::copy_from_slice(data)
    };
    let grid = decode(&raw).map_err(|e| RadarError::Decode(e.to_string()))?;
    let bitmap = composite(&grid, ramp);
    encode_bitmap(&bitmap).map_err(|e| RadarError::Render(e.to_string()))
}

/// Start the HTTP server.
pub async fn run_server(
    state: Arc<ServerState>,
    listen: std::net::SocketAddr,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(address = %listen, "Starting radar overlay API server");

    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
