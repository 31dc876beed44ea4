//! Parsing of the `Authorization` header.
//!
//! Accepted shapes are exactly `Bearer <token>` and
//! `Basic <base64(username:password)>`: one space, two tokens, scheme
//! keyword case-sensitive.
use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::STANDARD};

use super::error::{AuthError, Result};

pub const BEARER: &str = "Bearer";
pub const BASIC: &str = "Basic";

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Raw `Authorization` value. A value that is not visible ASCII counts as malformed.
pub fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>> {
    headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader))
        .transpose()
}

fn split_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        [s, value] if *s == scheme && !value.is_empty() => Ok(*value),
        _ => Err(AuthError::MalformedHeader),
    }
}

pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    split_scheme(header, BEARER)
}

pub fn extract_basic(header: Option<&str>) -> Result<BasicCredentials> {
    let encoded = split_scheme(header, BASIC)?;

    let payload = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::MalformedHeader)?;
    let payload = String::from_utf8(payload).map_err(|_| AuthError::MalformedHeader)?;

    let (username, password) = payload.split_once(':').ok_or(AuthError::MalformedHeader)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
