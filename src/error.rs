/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - auth error / repo error / validation error / extractor rejection を統一的に変換
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("token expired")]
    TokenExpired,
    #[error("insufficient scope")]
    Forbidden,
    #[error("upstream failure")]
    BadGateway,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized | AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadGateway => StatusCode::BAD_GATEWAY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::NotFound { resource } => ("not_found", format!("{resource} not found.")),
            AppError::Conflict { code, message } => (code, message),
            AppError::Unauthorized => ("UNAUTHORIZED", "unauthorized".into()),
            AppError::TokenExpired => ("UNAUTHORIZED", "token expired".into()),
            AppError::Forbidden => ("FORBIDDEN", "insufficient scope".into()),
            AppError::BadGateway => ("BAD_GATEWAY", "upstream authorization server error".into()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredential
            | AuthError::MalformedHeader
            | AuthError::MalformedToken(_) => AppError::Unauthorized,
            AuthError::ExpiredToken => AppError::TokenExpired,
            AuthError::InsufficientScope => AppError::Forbidden,
            AuthError::OAuth2ExchangeFailed(_) => AppError::BadGateway,
            AuthError::UnsupportedAlgorithm(_)
            | AuthError::InvalidConfig(_)
            | AuthError::SigningFailed(_) => AppError::Internal,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("INVALID_BODY", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request("INVALID_QUERY", rejection.body_text())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => AppError::not_found("example"),
            RepoError::AlreadyExists => AppError::conflict("CONFLICT", "example already exists"),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_failures_use_fixed_messages() {
        let (status, body) = render(AuthError::malformed("bad signature").into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "unauthorized");

        let (status, body) = render(AuthError::ExpiredToken.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "token expired");

        let (status, body) = render(AuthError::InsufficientScope.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "insufficient scope");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) =
            render(AuthError::exchange_failed("connection refused to 10.0.0.7").into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.to_string().contains("10.0.0.7"));

        let (status, body) =
            render(AuthError::SigningFailed("key /etc/jwt.pem".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert!(!body.to_string().contains("jwt.pem"));
    }

    #[tokio::test]
    async fn repo_errors_map_to_http() {
        let (status, _) = render(RepoError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = render(RepoError::AlreadyExists.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }
}
