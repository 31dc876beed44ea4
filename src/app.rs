/*
 * Responsibility
 * - Config 読み込み → tracing 初期化 → 依存生成 → Router 組み立て
 * - Middleware の適用 (metrics / CORS / request-id / trace / timeout)
 * - axum::serve() で起動し、シグナルで graceful shutdown
 */
use std::{panic, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, LogFormat};
use crate::metrics::HttpMetrics;
use crate::middleware;
use crate::repos::MemoryExampleRepo;
use crate::services::auth::build_authenticator;
use crate::state::AppState;

fn init_tracing(config: &Config) {
    // RUST_LOG があれば優先、なければ LOG_LEVEL
    // Ex:
    // RUST_LOG=info,api_template=debug,tower_http=debug cargo run
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},tower_http=info", config.log_level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    // Log only. Unwinding continues into CatchPanicLayer, which answers 500.
    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    init_tracing(&config);
    init_panic_hook();

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        signing_method = %config.jwt.signing_method,
        "starting API"
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Build process-level services and inject them into the shared state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let auth = build_authenticator(config).context("building authenticator")?;
    let examples = Arc::new(MemoryExampleRepo::new());
    let metrics = Arc::new(HttpMetrics::new(env!("CARGO_PKG_NAME")));

    Ok(AppState::new(auth, examples, metrics))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .merge(api::v1::health_routes())
        .nest("/api/v1", api::v1::routes(&state));
    if config.metrics_enabled {
        router = router.merge(api::v1::metrics_routes());
    }

    let metrics = state.metrics.clone();
    let mut router: Router = router.with_state(state);
    if config.metrics_enabled {
        router = middleware::metrics::apply(router, metrics);
    }

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.request_timeout)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
