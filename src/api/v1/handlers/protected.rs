/*
 * Responsibility
 * - 認証必須の handler (/protected/..., /me)
 * - AuthCtx は middleware が insert 済み (AuthCtxExtractor で受け取る)
 */
use axum::Json;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::api::v1::dto::profile::{ProtectedResource, UserProfile};
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn protected_resources(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<Vec<ProtectedResource>> {
    debug!(user_id = %ctx.user_id, "listing protected resources");

    let now = Utc::now();
    let resources = (1..=2)
        .map(|n| ProtectedResource {
            id: Uuid::new_v4(),
            name: format!("Protected Resource {n}"),
            content: format!("This is protected resource {n}."),
            created_at: now,
            owner_id: ctx.user_id.clone(),
        })
        .collect();

    Json(resources)
}

pub async fn user_profile(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<UserProfile> {
    let expires_at = ctx.claims.expires_at_utc();

    Json(UserProfile {
        id: ctx.user_id,
        issuer: ctx.claims.issuer,
        roles: ctx.claims.roles,
        scopes: ctx.scopes,
        expires_at,
    })
}
