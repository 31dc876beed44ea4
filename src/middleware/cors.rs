//! Cross-origin policy for browser clients.
//!
//! `CORS_ALLOWED_ORIGINS` is resolved once at startup:
//! - contains `*`: any origin
//! - non-empty list: exact match on the `Origin` header
//! - empty: any origin in development, none in production
//!
//! Credentials are never allowed, so the wildcard stays legal.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppEnv, Config};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Allowlist(Vec<HeaderValue>),
    Closed,
}

impl CorsPolicy {
    pub fn resolve(app_env: AppEnv, origins: &[String]) -> Self {
        if origins.iter().any(|o| o == "*") {
            return Self::AnyOrigin;
        }

        let listed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();

        match (listed.is_empty(), app_env.is_production()) {
            (false, _) => Self::Allowlist(listed),
            (true, false) => Self::AnyOrigin,
            (true, true) => Self::Closed,
        }
    }

    fn allow_origin(self) -> AllowOrigin {
        match self {
            Self::AnyOrigin => AllowOrigin::from(Any),
            Self::Allowlist(listed) => AllowOrigin::list(listed),
            Self::Closed => AllowOrigin::predicate(|_: &HeaderValue, _| false),
        }
    }

    pub fn layer(self) -> CorsLayer {
        let request_id = HeaderName::from_static("x-request-id");

        CorsLayer::new()
            .allow_origin(self.allow_origin())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                request_id.clone(),
            ])
            .expose_headers([request_id])
            .max_age(PREFLIGHT_MAX_AGE)
    }
}

pub fn apply(router: Router, config: &Config) -> Router {
    let policy = CorsPolicy::resolve(config.app_env, &config.cors_allowed_origins);
    tracing::debug!(?policy, "cors policy");
    router.layer(policy.layer())
}
