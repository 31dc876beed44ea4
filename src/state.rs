/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: Authenticator (署名設定は起動時に 1 度だけ構築、以後 read-only)
 *   - examples: ExampleRepo
 *   - metrics: HttpMetrics (middleware が記録、/metrics が出力)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::metrics::HttpMetrics;
use crate::repos::ExampleRepo;
use crate::services::auth::Authenticator;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub examples: Arc<dyn ExampleRepo>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(
        auth: Arc<Authenticator>,
        examples: Arc<dyn ExampleRepo>,
        metrics: Arc<HttpMetrics>,
    ) -> Self {
        Self {
            auth,
            examples,
            metrics,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
