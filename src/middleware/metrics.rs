//! Per-request metrics recording.
//!
//! Applied with `Router::layer` so `MatchedPath` is already resolved; requests
//! that hit no route are recorded under `path="unmatched"`.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::metrics::HttpMetrics;

const UNMATCHED: &str = "unmatched";

async fn track(State(metrics): State<Arc<HttpMetrics>>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED, MatchedPath::as_str)
        .to_owned();

    let _in_flight = metrics.start(&method, &path);
    let started = Instant::now();
    let res = next.run(req).await;
    metrics.record(&method, &path, res.status().as_u16(), started.elapsed());

    res
}

pub fn apply(router: Router, metrics: Arc<HttpMetrics>) -> Router {
    router.layer(from_fn_with_state(metrics, track))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    async fn call(router: &Router, uri: &str) -> StatusCode {
        router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn requests_are_counted_by_route_template() {
        let metrics = Arc::new(HttpMetrics::new("t"));
        let router = apply(
            Router::new().route("/items/{id}", get(|| async { "item" })),
            metrics.clone(),
        );

        assert_eq!(call(&router, "/items/1").await, StatusCode::OK);
        assert_eq!(call(&router, "/items/2").await, StatusCode::OK);
        assert_eq!(call(&router, "/nowhere").await, StatusCode::NOT_FOUND);

        assert_eq!(metrics.request_count("GET", "/items/{id}", 200), 2);
        assert_eq!(metrics.request_count("GET", "unmatched", 404), 1);
        assert!(metrics.render().contains(
            "t_http_requests_in_flight{method=\"GET\",path=\"/items/{id}\"} 0"
        ));
    }
}
