/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT / OAuth2 の検証ロジックは middleware/services 側の責務
 * - リクエスト単位の値: 他のリクエストと共有しない
 */

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` はトークンの `sub`
/// - `scopes` は scope 判定に使った権限
/// - `claims` は検証済みトークンの中身そのもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub scopes: Vec<String>,
    pub claims: Claims,
}

impl AuthCtx {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.subject.clone(),
            scopes: claims.scopes.clone(),
            claims,
        }
    }
}
