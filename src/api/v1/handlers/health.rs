/*
 * Responsibility
 * - GET /health, /health/liveness, /health/readiness
 * - 認証 middleware は通さない
 */
use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use tracing::warn;

use crate::api::v1::dto::health::{Component, HealthResponse, HealthStatus};
use crate::state::AppState;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = "REST API template with JWT and OAuth2 authentication";

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

async fn repository_check(state: &AppState) -> Component {
    let (status, description) =
        match tokio::time::timeout(CHECK_TIMEOUT, state.examples.ping()).await {
            Ok(Ok(())) => (HealthStatus::Up, None),
            Ok(Err(err)) => {
                warn!(error = %err, "repository ping failed");
                (HealthStatus::Down, Some("ping failed".to_string()))
            }
            Err(_) => {
                warn!("repository ping timed out");
                (HealthStatus::Down, Some("ping timed out".to_string()))
            }
        };

    Component {
        name: "repository",
        status,
        description,
        last_checked: Utc::now(),
    }
}

fn status_code(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let components = vec![repository_check(&state).await];
    let status = if components.iter().all(|c| c.status == HealthStatus::Up) {
        HealthStatus::Up
    } else {
        HealthStatus::Down
    };

    (
        status_code(status),
        Json(HealthResponse {
            name: NAME,
            version: VERSION,
            description: Some(DESCRIPTION),
            status,
            components,
            timestamp: Utc::now(),
        }),
    )
}

pub async fn readiness(state: State<AppState>) -> impl IntoResponse {
    health(state).await
}

/// Process is up; dependencies are not consulted.
pub async fn liveness() -> impl IntoResponse {
    Json(HealthResponse {
        name: NAME,
        version: VERSION,
        description: None,
        status: HealthStatus::Up,
        components: Vec::new(),
        timestamp: Utc::now(),
    })
}
