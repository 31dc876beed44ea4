//! Signed token encoding / verification.
//!
//! Wire format is a compact JWT (`header.claims.signature`). Signature work is
//! delegated to `jsonwebtoken`; expiry and not-before are checked here against
//! an explicit `now` so the boundary is exact (`now > exp` is expired).
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};

use super::claims::{AlgorithmFamily, Claims, SigningAlgorithm};
use super::error::{AuthError, Result};

/// Raw key material as it comes out of configuration.
#[derive(Clone, Default)]
pub struct KeyMaterial {
    pub secret: Option<Vec<u8>>,
    pub private_key_pem: Option<String>,
    pub public_key_pem: Option<String>,
}

impl KeyMaterial {
    pub fn hmac(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Some(secret.as_ref().to_vec()),
            ..Self::default()
        }
    }

    pub fn rsa(private_key_pem: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        Self {
            private_key_pem: Some(private_key_pem.into()),
            public_key_pem: Some(public_key_pem.into()),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    algorithm: SigningAlgorithm,
    issuer: String,
    encoding_key: EncodingKey,
    // One verification key per family. A family without a key fails closed.
    hmac_key: Option<DecodingKey>,
    rsa_key: Option<DecodingKey>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("hmac", &self.hmac_key.is_some())
            .field("rsa", &self.rsa_key.is_some())
            .finish()
    }
}

impl TokenCodec {
    pub fn new(
        algorithm: SigningAlgorithm,
        issuer: impl Into<String>,
        keys: &KeyMaterial,
    ) -> Result<Self> {
        let secret = keys.secret.as_deref().filter(|s| !s.is_empty());

        let hmac_key = secret.map(DecodingKey::from_secret);
        let rsa_key = keys
            .public_key_pem
            .as_deref()
            .map(|pem| {
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::InvalidConfig(format!("rsa public key: {e}")))
            })
            .transpose()?;

        let encoding_key = match algorithm.family() {
            AlgorithmFamily::Hmac => {
                let secret = secret.ok_or_else(|| {
                    AuthError::InvalidConfig(format!("{algorithm} requires a non-empty secret"))
                })?;
                EncodingKey::from_secret(secret)
            }
            AlgorithmFamily::Rsa => {
                let pem = keys.private_key_pem.as_deref().ok_or_else(|| {
                    AuthError::InvalidConfig(format!("{algorithm} requires a private key"))
                })?;
                if rsa_key.is_none() {
                    return Err(AuthError::InvalidConfig(format!(
                        "{algorithm} requires a public key"
                    )));
                }
                EncodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::InvalidConfig(format!("rsa private key: {e}")))?
            }
        };

        Ok(Self {
            algorithm,
            issuer: issuer.into(),
            encoding_key,
            hmac_key,
            rsa_key,
        })
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn issue(&self, claims: &Claims) -> Result<String> {
        let mut header = Header::new(self.algorithm.into());
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AuthError::SigningFailed(e.to_string())
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify `token` as of `now` (seconds since the epoch).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthError::malformed(format!("header: {e}")))?;

        let algorithm = SigningAlgorithm::from_jwt(header.alg).ok_or_else(|| {
            AuthError::malformed(format!("unexpected signing method: {:?}", header.alg))
        })?;

        let key = match algorithm.family() {
            AlgorithmFamily::Hmac => self.hmac_key.as_ref(),
            AlgorithmFamily::Rsa => self.rsa_key.as_ref(),
        }
        .ok_or_else(|| {
            AuthError::malformed(format!("no verification key for {algorithm}"))
        })?;

        let mut validation = Validation::new(algorithm.into());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let claims = jsonwebtoken::decode::<Claims>(token, key, &validation)
            .map_err(|e| {
                debug!(error = %e, "jwt decode failed");
                AuthError::malformed(e.to_string())
            })?
            .claims;

        if claims.subject.trim().is_empty() {
            return Err(AuthError::malformed("empty 'sub' claim"));
        }
        if claims.expires_at <= claims.issued_at {
            return Err(AuthError::malformed("'exp' is not after 'iat'"));
        }
        if now > claims.expires_at {
            return Err(AuthError::ExpiredToken);
        }
        if let Some(nbf) = claims.not_before
            && nbf > now
        {
            return Err(AuthError::malformed("token not yet valid"));
        }

        Ok(claims)
    }
}
