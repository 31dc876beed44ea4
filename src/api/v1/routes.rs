/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /hello, /examples, /protected, /me, /auth/oauth2 を merge
 * - 認証が必要な範囲は RequireAuth / RequireOAuth2 を route_layer で適用する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::access::{RequireAuth, RequireOAuth2};
use crate::services::auth::RequiredScopes;
use crate::state::AppState;

use crate::api::v1::handlers::{
    examples::{create_example, delete_example, get_example, list_examples, update_example},
    health::{health, liveness, readiness},
    hello::hello,
    metrics::metrics,
    oauth2::{authorize, callback, refresh},
    protected::{protected_resources, user_profile},
};

/// Probes live outside `/api/v1`.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// Scrape endpoint, also outside `/api/v1`.
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let read = RequiredScopes::any_of(["read"]);

    let jwt_protected = RequireAuth::new(state.auth.clone(), read.clone())
        .apply(Router::new().route("/protected/jwt", get(protected_resources)));

    let oauth2_protected = RequireOAuth2::new(state.auth.clone(), read)
        .apply(Router::new().route("/protected/oauth2", get(protected_resources)));

    // /me は scope 不要 (認証のみ)
    let me_jwt = RequireAuth::new(state.auth.clone(), RequiredScopes::none())
        .apply(Router::new().route("/me", get(user_profile)));

    let me_oauth2 = RequireOAuth2::new(state.auth.clone(), RequiredScopes::none())
        .apply(Router::new().route("/me/oauth2", get(user_profile)));

    Router::new()
        .route("/hello", get(hello))
        .route("/examples", get(list_examples).post(create_example))
        .route(
            "/examples/{id}",
            get(get_example).put(update_example).delete(delete_example),
        )
        .route("/auth/oauth2/authorize", get(authorize))
        .route("/auth/oauth2/callback", get(callback))
        .route("/auth/oauth2/refresh", post(refresh))
        .merge(jwt_protected)
        .merge(oauth2_protected)
        .merge(me_jwt)
        .merge(me_oauth2)
}
