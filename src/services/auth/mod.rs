pub mod authenticator;
pub mod claims;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod oauth2;
pub mod scope;
pub mod token_codec;

pub use authenticator::{Authenticator, MAX_TOKEN_LIFETIME, SigningConfig};
pub use claims::{AlgorithmFamily, Claims, SigningAlgorithm};
pub use error::{AuthError, Result};
pub use factory::build_authenticator;
pub use oauth2::{OAuth2Client, OAuth2Settings, OAuth2Token};
pub use scope::{RequiredScopes, authorize, is_authorized};
pub use token_codec::{KeyMaterial, TokenCodec};
