use axum::extract::FromRequestParts;
use axum::http::{Extensions, request::Parts};

use crate::error::AppError;
use crate::services::auth::Claims;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}

pub fn get_user_id(extensions: &Extensions) -> Option<&str> {
    extensions.get::<AuthCtx>().map(|ctx| ctx.user_id.as_str())
}

pub fn get_scopes(extensions: &Extensions) -> Option<&[String]> {
    extensions.get::<AuthCtx>().map(|ctx| ctx.scopes.as_slice())
}

pub fn get_claims(extensions: &Extensions) -> Option<&Claims> {
    extensions.get::<AuthCtx>().map(|ctx| &ctx.claims)
}
