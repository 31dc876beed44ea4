use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use super::claims::{Claims, SigningAlgorithm};
use super::error::{AuthError, Result};
use super::oauth2::{OAuth2Client, OAuth2Settings, OAuth2Token};
use super::token_codec::{KeyMaterial, TokenCodec};

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Process-wide signing parameters. Built once at startup, never mutated.
#[derive(Clone)]
pub struct SigningConfig {
    pub algorithm: SigningAlgorithm,
    pub keys: KeyMaterial,
    pub issuer: String,
    pub token_lifetime: Duration,
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}

/// Issues and verifies this service's tokens, and fronts the OAuth2 provider.
///
/// Shared read-only across requests (`Arc<Authenticator>` in `AppState`).
/// JWT verification is pure CPU work; only the OAuth2 methods do I/O.
#[derive(Debug, Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    lifetime_seconds: i64,
    oauth2: OAuth2Client,
}

impl Authenticator {
    pub fn new(signing: SigningConfig, oauth2: OAuth2Settings) -> Result<Self> {
        if signing.token_lifetime > MAX_TOKEN_LIFETIME {
            return Err(AuthError::InvalidConfig(format!(
                "token lifetime exceeds {}s",
                MAX_TOKEN_LIFETIME.as_secs()
            )));
        }
        let lifetime_seconds = i64::try_from(signing.token_lifetime.as_secs())
            .map_err(|_| AuthError::InvalidConfig("token lifetime out of range".into()))?;
        if lifetime_seconds <= 0 {
            return Err(AuthError::InvalidConfig(
                "token lifetime must be at least one second".into(),
            ));
        }

        let codec = TokenCodec::new(signing.algorithm, signing.issuer, &signing.keys)?;
        let oauth2 = OAuth2Client::new(oauth2)?;

        Ok(Self {
            codec,
            lifetime_seconds,
            oauth2,
        })
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.codec.algorithm()
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }

    pub fn generate_token(
        &self,
        subject: &str,
        roles: Vec<String>,
        scopes: Vec<String>,
    ) -> Result<String> {
        self.generate_token_at(subject, roles, scopes, Utc::now())
    }

    pub fn generate_token_at(
        &self,
        subject: &str,
        roles: Vec<String>,
        scopes: Vec<String>,
        issued_at: DateTime<Utc>,
    ) -> Result<String> {
        if subject.trim().is_empty() {
            return Err(AuthError::malformed("subject must not be empty"));
        }

        let claims = Claims::new(
            self.codec.issuer(),
            subject,
            roles,
            scopes,
            issued_at,
            self.lifetime_seconds,
        )?;
        self.codec.issue(&claims)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.codec.verify(token)
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        self.codec.verify_at(token, now.timestamp())
    }

    pub fn build_authorization_url(&self, state: &str) -> Url {
        self.oauth2.authorization_url(state)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuth2Token> {
        self.oauth2.exchange_code(code).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token> {
        self.oauth2.refresh(refresh_token).await
    }

    /// Resolve an OAuth2 access token to claims through provider introspection.
    pub async fn verify_oauth2_token(&self, token: &str) -> Result<Claims> {
        self.oauth2.introspect(token, Utc::now().timestamp()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn oauth2_settings() -> OAuth2Settings {
        OAuth2Settings {
            client_id: "test-client-id".into(),
            client_secret: "test-client-secret".into(),
            redirect_url: Url::parse("http://localhost:8080/api/v1/auth/oauth2/callback")
                .unwrap(),
            auth_url: Url::parse("https://example.com/oauth/authorize").unwrap(),
            token_url: Url::parse("https://example.com/oauth/token").unwrap(),
            introspection_url: None,
            scopes: vec!["read".into(), "write".into()],
            timeout: Duration::from_secs(5),
        }
    }

    pub(crate) fn test_authenticator() -> Authenticator {
        Authenticator::new(
            SigningConfig {
                algorithm: SigningAlgorithm::Hs256,
                keys: KeyMaterial::hmac("test-secret-key"),
                issuer: "api-template-test".into(),
                token_lifetime: Duration::from_secs(3600),
            },
            oauth2_settings(),
        )
        .unwrap()
    }

    #[test]
    fn generated_token_verifies_to_same_identity() {
        let auth = test_authenticator();
        let token = auth
            .generate_token("u1", vec!["user".into()], vec!["read".into()])
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.subject, "u1");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.scopes, vec!["read".to_string()]);
        assert_eq!(claims.issuer, "api-template-test");
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
        assert!(claims.token_id.is_some());
    }

    #[test]
    fn expiry_is_checked_against_lifetime() {
        let auth = test_authenticator();
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = auth
            .generate_token_at("u1", vec![], vec![], issued)
            .unwrap();

        let at_expiry = issued + chrono::Duration::seconds(3600);
        assert!(auth.verify_token_at(&token, at_expiry).is_ok());

        let after = at_expiry + chrono::Duration::seconds(1);
        assert!(matches!(
            auth.verify_token_at(&token, after),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        let err = Authenticator::new(
            SigningConfig {
                algorithm: SigningAlgorithm::Hs256,
                keys: KeyMaterial::hmac("secret"),
                issuer: "iss".into(),
                token_lifetime: Duration::ZERO,
            },
            oauth2_settings(),
        )
        .unwrap_err();

        assert!(matches!(err, AuthError::InvalidConfig(_)));
    }

    #[test]
    fn oversized_lifetime_is_rejected() {
        for lifetime in [
            MAX_TOKEN_LIFETIME + Duration::from_secs(1),
            Duration::from_secs(i64::MAX as u64),
        ] {
            let err = Authenticator::new(
                SigningConfig {
                    algorithm: SigningAlgorithm::Hs256,
                    keys: KeyMaterial::hmac("secret"),
                    issuer: "iss".into(),
                    token_lifetime: lifetime,
                },
                oauth2_settings(),
            )
            .unwrap_err();

            assert!(matches!(err, AuthError::InvalidConfig(_)), "{lifetime:?}");
        }
    }

    #[test]
    fn empty_subject_is_not_issued() {
        let auth = test_authenticator();
        assert!(auth.generate_token(" ", vec![], vec![]).is_err());
    }

    #[test]
    fn debug_hides_keys() {
        let cfg = SigningConfig {
            algorithm: SigningAlgorithm::Hs256,
            keys: KeyMaterial::hmac("super-secret"),
            issuer: "iss".into(),
            token_lifetime: Duration::from_secs(60),
        };
        assert!(!format!("{cfg:?}").contains("super-secret"));
        assert!(!format!("{:?}", test_authenticator()).contains("test-secret-key"));
    }
}
