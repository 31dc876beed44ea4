pub mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor, get_claims, get_scopes, get_user_id};
