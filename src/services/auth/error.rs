//! Authentication / authorization failures.
//!
//! Every variant is terminal for the request that produced it. The HTTP layer
//! only ever sees the status code and a fixed message (see `crate::error`); the
//! detail carried here is for logs.
use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header (or an empty one).
    #[error("missing credential")]
    MissingCredential,

    /// The header is present but not `<Scheme> <value>` for the expected scheme.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Structurally invalid token, bad signature, wrong issuer, not yet valid, ...
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("insufficient scope")]
    InsufficientScope,

    /// The remote token endpoint rejected the request or could not be reached.
    #[error("oauth2 exchange failed: {0}")]
    OAuth2ExchangeFailed(String),

    /// Unusable signing setup: missing or unparsable keys, lifetime out of range.
    #[error("invalid auth configuration: {0}")]
    InvalidConfig(String),

    /// The configured key failed to sign a claim set. Server fault, per request.
    #[error("token signing failed: {0}")]
    SigningFailed(String),
}

impl AuthError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken(reason.into())
    }

    pub fn exchange_failed(reason: impl Into<String>) -> Self {
        Self::OAuth2ExchangeFailed(reason.into())
    }

    /// Status the request is rejected with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential
            | Self::MalformedHeader
            | Self::MalformedToken(_)
            | Self::ExpiredToken => StatusCode::UNAUTHORIZED,
            Self::InsufficientScope => StatusCode::FORBIDDEN,
            Self::OAuth2ExchangeFailed(_) => StatusCode::BAD_GATEWAY,
            Self::UnsupportedAlgorithm(_) | Self::InvalidConfig(_) | Self::SigningFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_and_token_failures_are_unauthorized() {
        assert_eq!(
            AuthError::MissingCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MalformedHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::malformed("bad signature").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn scope_failure_is_forbidden() {
        assert_eq!(
            AuthError::InsufficientScope.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn exchange_failure_is_bad_gateway() {
        assert_eq!(
            AuthError::exchange_failed("timeout").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn signing_failure_is_a_server_fault() {
        let err = AuthError::SigningFailed("InvalidKeyFormat".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!matches!(err, AuthError::InvalidConfig(_)));
    }
}
