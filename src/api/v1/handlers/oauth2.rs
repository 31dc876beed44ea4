/*
 * Responsibility
 * - OAuth2 authorization-code フロー (authorize → callback → refresh)
 * - provider とのやり取りは Authenticator に委譲する
 */
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::Redirect,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    api::v1::dto::oauth2::{AuthorizeQuery, CallbackQuery, RefreshRequest},
    error::AppError,
    services::auth::OAuth2Token,
    state::AppState,
};

/// 303 to the provider's consent page. A random `state` is used when none is given.
pub async fn authorize(
    State(state): State<AppState>,
    Query(query): Query<AuthorizeQuery>,
) -> Redirect {
    let csrf_state = query
        .state
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let url = state.auth.build_authorization_url(&csrf_state);
    Redirect::to(url.as_str())
}

pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<OAuth2Token>, AppError> {
    if let Some(error) = query.error {
        warn!(%error, "authorization denied by provider");
        return Err(AppError::bad_request("OAUTH2_DENIED", "authorization was denied"));
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("MISSING_CODE", "code is required"))?;

    let token = state.auth.exchange_code(&code).await.map_err(|err| {
        warn!(error = %err, "authorization code exchange failed");
        AppError::from(err)
    })?;

    info!("authorization code exchanged");
    Ok(Json(token))
}

pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<OAuth2Token>, AppError> {
    let Json(req) = body?;
    if req.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request(
            "MISSING_REFRESH_TOKEN",
            "refresh_token is required",
        ));
    }

    let token = state
        .auth
        .refresh_token(&req.refresh_token)
        .await
        .map_err(|err| {
            warn!(error = %err, "token refresh failed");
            AppError::from(err)
        })?;

    Ok(Json(token))
}
