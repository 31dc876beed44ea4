use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthError;

/// Identity and permissions bound to a token.
///
/// Registered claims use their JWT names on the wire (`iss`, `sub`, `iat`,
/// `nbf`, `exp`, `jti`). Timestamps are whole seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "nbf", default)]
    pub not_before: Option<i64>,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "jti", default)]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

impl Claims {
    /// Fresh claims valid from `issued_at` for `lifetime_seconds`, with a random `jti`.
    ///
    /// Fails unless `exp` lands strictly after `iat` without overflowing.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        roles: Vec<String>,
        scopes: Vec<String>,
        issued_at: DateTime<Utc>,
        lifetime_seconds: i64,
    ) -> Result<Self, AuthError> {
        let iat = issued_at.timestamp();
        let exp = iat
            .checked_add(lifetime_seconds)
            .filter(|exp| *exp > iat)
            .ok_or_else(|| {
                AuthError::InvalidConfig(format!("token lifetime {lifetime_seconds}s out of range"))
            })?;

        Ok(Self {
            issuer: issuer.into(),
            subject: subject.into(),
            issued_at: iat,
            not_before: Some(iat),
            expires_at: exp,
            token_id: Some(Uuid::new_v4().to_string()),
            roles,
            scopes,
        })
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Which kind of key material an algorithm needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Shared secret.
    Hmac,
    /// Private key to sign, public key to verify.
    Rsa,
}

/// The closed set of signing algorithms this service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Hs256,
    Hs384,
    Hs512,
    Rs256,
    Rs384,
    Rs512,
}

impl SigningAlgorithm {
    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => AlgorithmFamily::Hmac,
            Self::Rs256 | Self::Rs384 | Self::Rs512 => AlgorithmFamily::Rsa,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }

    /// Maps a decoded token header algorithm back into the accepted set.
    pub fn from_jwt(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::HS256 => Some(Self::Hs256),
            Algorithm::HS384 => Some(Self::Hs384),
            Algorithm::HS512 => Some(Self::Hs512),
            Algorithm::RS256 => Some(Self::Rs256),
            Algorithm::RS384 => Some(Self::Rs384),
            Algorithm::RS512 => Some(Self::Rs512),
            _ => None,
        }
    }
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::Hs256 => Algorithm::HS256,
            SigningAlgorithm::Hs384 => Algorithm::HS384,
            SigningAlgorithm::Hs512 => Algorithm::HS512,
            SigningAlgorithm::Rs256 => Algorithm::RS256,
            SigningAlgorithm::Rs384 => Algorithm::RS384,
            SigningAlgorithm::Rs512 => Algorithm::RS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = AuthError;

    /// Unknown names are an error. There is no fallback to HS256.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            _ => Err(AuthError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_algorithms_case_insensitively() {
        assert_eq!(
            "HS256".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::Hs256
        );
        assert_eq!(
            "rs512".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::Rs512
        );
        assert_eq!(SigningAlgorithm::Hs384.family(), AlgorithmFamily::Hmac);
        assert_eq!(SigningAlgorithm::Rs384.family(), AlgorithmFamily::Rsa);
    }

    #[test]
    fn unknown_algorithm_is_rejected_not_defaulted() {
        let err = "ES256".parse::<SigningAlgorithm>().unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedAlgorithm(name) if name == "ES256"));
    }

    #[test]
    fn wire_names_are_registered_claim_names() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new("iss", "u1", vec![], vec!["read".into()], now, 60).unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "u1");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_060);
        assert_eq!(json["scopes"][0], "read");
        // empty roles are omitted
        assert!(json.get("roles").is_none());
    }

    #[test]
    fn expiry_must_follow_issue_time() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();

        for lifetime in [0, -60, i64::MAX] {
            let err = Claims::new("iss", "u1", vec![], vec![], now, lifetime).unwrap_err();
            assert!(matches!(err, AuthError::InvalidConfig(_)), "{lifetime}");
        }
    }
}
