/// Factory: build `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AlgorithmFamily, Authenticator, KeyMaterial, Result, SigningConfig,
};

pub fn build_authenticator(config: &Config) -> Result<Arc<Authenticator>> {
    let jwt = &config.jwt;

    // 設定したアルゴリズムのファミリーの鍵だけを渡す (RS 運用時に HS トークンを通さない)
    let keys = match jwt.signing_method.family() {
        AlgorithmFamily::Hmac => KeyMaterial::hmac(&jwt.secret),
        AlgorithmFamily::Rsa => KeyMaterial {
            secret: None,
            private_key_pem: jwt.private_key_pem.clone(),
            public_key_pem: jwt.public_key_pem.clone(),
        },
    };

    let auth = Authenticator::new(
        SigningConfig {
            algorithm: jwt.signing_method,
            keys,
            issuer: jwt.issuer.clone(),
            token_lifetime: jwt.expiration,
        },
        config.oauth2.clone(),
    )?;

    Ok(Arc::new(auth))
}
