use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::state::AppState;
use crate::telemetry::StatsSnapshot;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// GET /metrics
/// Prometheus text exposition of the in-process counters.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render_prometheus(),
    )
}

/// GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.metrics.stats())
}
