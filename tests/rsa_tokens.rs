use std::time::Duration;

use api_template::services::auth::{
    AuthError, Authenticator, KeyMaterial, OAuth2Settings, SigningAlgorithm, SigningConfig,
};
use url::Url;

const PRIVATE_KEY: &str = include_str!("fixtures/rsa_private.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/rsa_public.pem");

fn oauth2() -> OAuth2Settings {
    OAuth2Settings {
        client_id: "client".into(),
        client_secret: "secret".into(),
        redirect_url: Url::parse("http://localhost:8080/api/v1/auth/oauth2/callback").unwrap(),
        auth_url: Url::parse("https://example.com/oauth/authorize").unwrap(),
        token_url: Url::parse("https://example.com/oauth/token").unwrap(),
        introspection_url: None,
        scopes: vec!["read".into()],
        timeout: Duration::from_secs(5),
    }
}

fn authenticator(
    algorithm: SigningAlgorithm,
    keys: KeyMaterial,
) -> Result<Authenticator, AuthError> {
    Authenticator::new(
        SigningConfig {
            algorithm,
            keys,
            issuer: "api-template".into(),
            token_lifetime: Duration::from_secs(600),
        },
        oauth2(),
    )
}

#[test]
fn rsa_variants_round_trip() {
    for alg in [
        SigningAlgorithm::Rs256,
        SigningAlgorithm::Rs384,
        SigningAlgorithm::Rs512,
    ] {
        let auth = authenticator(alg, KeyMaterial::rsa(PRIVATE_KEY, PUBLIC_KEY)).unwrap();
        let token = auth
            .generate_token("u1", vec!["user".into()], vec!["read".into(), "write".into()])
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.subject, "u1", "{alg}");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert_eq!(claims.scopes, vec!["read".to_string(), "write".to_string()]);
    }
}

#[test]
fn hmac_token_is_rejected_in_rsa_mode() {
    let rsa = authenticator(
        SigningAlgorithm::Rs256,
        KeyMaterial::rsa(PRIVATE_KEY, PUBLIC_KEY),
    )
    .unwrap();
    let hmac = authenticator(SigningAlgorithm::Hs256, KeyMaterial::hmac("shared")).unwrap();

    let token = hmac.generate_token("u1", vec![], vec![]).unwrap();
    assert!(matches!(
        rsa.verify_token(&token),
        Err(AuthError::MalformedToken(_))
    ));
}

#[test]
fn public_key_cannot_be_used_as_hmac_secret() {
    // Classic key-confusion: sign HS256 with the RSA public key bytes.
    let forger = authenticator(SigningAlgorithm::Hs256, KeyMaterial::hmac(PUBLIC_KEY)).unwrap();
    let rsa = authenticator(
        SigningAlgorithm::Rs256,
        KeyMaterial::rsa(PRIVATE_KEY, PUBLIC_KEY),
    )
    .unwrap();

    let forged = forger.generate_token("admin", vec![], vec!["admin".into()]).unwrap();
    assert!(rsa.verify_token(&forged).is_err());
}

#[test]
fn garbage_pem_is_a_config_error() {
    let err = authenticator(
        SigningAlgorithm::Rs256,
        KeyMaterial::rsa("not a key", "not a key either"),
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::InvalidConfig(_)));
}
