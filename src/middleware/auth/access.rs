//! access token 検証 → scope 判定 → AuthCtx を extensions に入れる
//!
//! State machine per request:
//!
//! ```text
//! NoCredential --bearer--> CredentialExtracted --verify--> Verified --scope--> Authorized
//!       |                          |                          |
//!       +------------------------> Rejected(401 / 401 "token expired" / 403)
//! ```
//!
//! `RequireAuth` verifies this service's own JWTs (pure CPU, no I/O).
//! `RequireOAuth2` resolves the bearer token through provider introspection.
//! Both are attached per route group with `route_layer`, so unmatched paths
//! still 404 instead of 401.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::debug;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{
    AuthError, Authenticator, Claims, RequiredScopes, Result, authorize, credentials,
};

/// JWT guard. `RequireAuth::new(auth, scopes)` is the per-route factory.
///
/// 例：
/// ```ignore
/// let jwt = RequireAuth::new(state.auth.clone(), RequiredScopes::any_of(["read"]));
/// let protected = jwt.apply(Router::new().route("/protected/jwt", get(handler)));
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth {
    auth: Arc<Authenticator>,
    scopes: RequiredScopes,
}

impl RequireAuth {
    pub fn new(auth: Arc<Authenticator>, scopes: RequiredScopes) -> Self {
        Self { auth, scopes }
    }

    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に渡す
        router.route_layer(middleware::from_fn_with_state(self, jwt_middleware))
    }
}

/// OAuth2 guard: same flow, verification by introspection.
#[derive(Debug, Clone)]
pub struct RequireOAuth2 {
    auth: Arc<Authenticator>,
    scopes: RequiredScopes,
}

impl RequireOAuth2 {
    pub fn new(auth: Arc<Authenticator>, scopes: RequiredScopes) -> Self {
        Self { auth, scopes }
    }

    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self, oauth2_middleware))
    }
}

/// Run the whole state machine for one `Authorization` value.
///
/// `verify` turns the extracted credential into claims; the guard decides
/// which verifier that is.
pub fn authenticate<F>(
    header: Option<&str>,
    verify: F,
    required: &RequiredScopes,
) -> Result<AuthCtx>
where
    F: FnOnce(&str) -> Result<Claims>,
{
    let token = credentials::extract_bearer(header)?;
    let claims = verify(token)?;
    admit(claims, required)
}

/// `Verified -> Authorized`: scope gate, then build the request context.
pub fn admit(claims: Claims, required: &RequiredScopes) -> Result<AuthCtx> {
    authorize(&claims.scopes, required)?;
    Ok(AuthCtx::from_claims(claims))
}

fn reject(kind: &'static str, err: AuthError) -> AppError {
    debug!(guard = kind, error = %err, "request rejected");
    AppError::from(err)
}

async fn jwt_middleware(
    State(guard): State<RequireAuth>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let ctx = credentials::authorization_header(req.headers())
        .and_then(|header| {
            authenticate(header, |token| guard.auth.verify_token(token), &guard.scopes)
        })
        .map_err(|err| reject("jwt", err))?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

async fn oauth2_middleware(
    State(guard): State<RequireOAuth2>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let verified = match credentials::authorization_header(req.headers())
        .and_then(credentials::extract_bearer)
    {
        Ok(token) => guard.auth.verify_oauth2_token(token).await,
        Err(err) => Err(err),
    };

    let ctx = verified
        .and_then(|claims| admit(claims, &guard.scopes))
        .map_err(|err| match err {
            // introspection 不達はクライアントの資格情報の問題ではないが、保護リソースとしては 401 で閉じる
            AuthError::OAuth2ExchangeFailed(_) => {
                reject("oauth2", AuthError::malformed(err.to_string()))
            }
            other => reject("oauth2", other),
        })?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
