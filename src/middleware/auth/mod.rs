pub mod access;

pub use access::{RequireAuth, RequireOAuth2, admit, authenticate};
