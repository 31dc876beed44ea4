/*
 * Responsibility
 * - GET /metrics (Prometheus text format)
 * - METRICS_ENABLED=false のときは route 自体を登録しない
 */
use axum::{extract::State, http::header, response::IntoResponse};

use crate::metrics::CONTENT_TYPE;
use crate::state::AppState;

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], state.metrics.render())
}
