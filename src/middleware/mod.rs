/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (RequireAuth / RequireOAuth2), cors, http (request-id / trace / timeout / panic)
 * - metrics (request count / duration / in-flight)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod metrics;
