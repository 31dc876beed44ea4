/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 * - get_user_id / get_scopes / get_claims
 */

mod core;
mod types;

pub use core::{AuthCtxExtractor, get_claims, get_scopes, get_user_id};
pub use types::AuthCtx;
