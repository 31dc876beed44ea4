use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub state: Option<String>,
}

/// Provider redirect back to us: either `code` or `error`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
