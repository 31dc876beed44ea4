//! OAuth2 authorization-code client.
//!
//! Thin wrapper over the provider's authorization, token and introspection
//! endpoints. Nothing here retries: a failed or timed-out call surfaces as
//! `OAuth2ExchangeFailed` and the caller decides. Dropping a returned future
//! aborts the request, so callers can bound it with `tokio::time::timeout`.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::claims::Claims;
use super::error::{AuthError, Result};

#[derive(Clone)]
pub struct OAuth2Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: Url,
    pub auth_url: Url,
    pub token_url: Url,
    /// RFC 7662 endpoint. Without it no OAuth2 access token verifies.
    pub introspection_url: Option<Url>,
    pub scopes: Vec<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for OAuth2Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Settings")
            .field("client_id", &self.client_id)
            .field("redirect_url", &self.redirect_url.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("introspection_url", &self.introspection_url.as_ref().map(Url::as_str))
            .field("scopes", &self.scopes)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Token endpoint response (RFC 6749 section 5.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Introspection {
    active: bool,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    nbf: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    jti: Option<String>,
}

#[derive(Clone)]
pub struct OAuth2Client {
    settings: OAuth2Settings,
    http: reqwest::Client,
}

impl std::fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("client_id", &self.settings.client_id)
            .field("token_url", &self.settings.token_url.as_str())
            .finish_non_exhaustive()
    }
}

impl OAuth2Client {
    pub fn new(settings: OAuth2Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AuthError::exchange_failed(format!("http client: {e}")))?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &OAuth2Settings {
        &self.settings
    }

    /// Where to send the user agent to start the authorization-code flow.
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.settings.auth_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.settings.client_id)
                .append_pair("redirect_uri", self.settings.redirect_url.as_str());
            if !self.settings.scopes.is_empty() {
                query.append_pair("scope", &self.settings.scopes.join(" "));
            }
            query
                .append_pair("state", state)
                .append_pair("access_type", "online");
        }
        url
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuth2Token> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_url.as_str()),
        ])
        .await
    }

    /// A provider that does not rotate refresh tokens omits `refresh_token`;
    /// the one presented is carried over in that case.
    pub async fn refresh(&self, refresh_token: &str) -> Result<OAuth2Token> {
        let mut token = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<OAuth2Token> {
        let response = self
            .http
            .post(self.settings.token_url.clone())
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "oauth2 token request failed");
                AuthError::exchange_failed(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<ProviderError>().await {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {desc}", err.error),
                    None => err.error,
                },
                Err(_) => format!("HTTP {status}"),
            };
            debug!(%status, reason = %reason, "oauth2 token endpoint rejected request");
            return Err(AuthError::exchange_failed(reason));
        }

        response
            .json::<OAuth2Token>()
            .await
            .map_err(|e| AuthError::exchange_failed(format!("invalid token response: {e}")))
    }

    /// Verify an OAuth2 access token with the provider (RFC 7662).
    ///
    /// Inactive tokens and an unconfigured endpoint fail closed.
    pub async fn introspect(&self, token: &str, now: i64) -> Result<Claims> {
        let url = self
            .settings
            .introspection_url
            .clone()
            .ok_or_else(|| AuthError::malformed("no introspection endpoint configured"))?;

        let response = self
            .http
            .post(url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("token", token), ("token_type_hint", "access_token")])
            .send()
            .await
            .map_err(|e| AuthError::exchange_failed(format!("introspection failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::exchange_failed(format!(
                "introspection HTTP {status}"
            )));
        }

        let body: Introspection = response
            .json()
            .await
            .map_err(|e| AuthError::exchange_failed(format!("invalid introspection: {e}")))?;

        if !body.active {
            return Err(AuthError::malformed("inactive token"));
        }

        let subject = body
            .sub
            .or(body.username)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::malformed("introspection without subject"))?;

        // Active with no `exp`: valid until the provider says otherwise.
        let expires_at = body.exp.unwrap_or(i64::MAX);
        if now > expires_at {
            return Err(AuthError::ExpiredToken);
        }

        Ok(Claims {
            issuer: body
                .iss
                .unwrap_or_else(|| self.settings.token_url.origin().ascii_serialization()),
            subject,
            issued_at: body.iat.unwrap_or(now).min(expires_at - 1),
            not_before: body.nbf,
            expires_at,
            token_id: body.jti,
            roles: Vec::new(),
            scopes: body
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }
}
