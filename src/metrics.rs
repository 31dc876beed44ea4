//! HTTP request metrics, exposed in the Prometheus text format.
//!
//! Three families, all prefixed with the service namespace:
//! - `http_requests_total{method,path,status}` counter
//! - `http_request_duration_seconds{method,path,status}` histogram
//! - `http_requests_in_flight{method,path}` gauge
//!
//! `path` is the matched route template (`/api/v1/examples/{id}`), never the
//! raw URI, so label cardinality is bounded by the route table.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::Mutex;

/// Upper bounds (seconds) of the duration histogram buckets.
const DURATION_BUCKETS: [f64; 8] = [0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Content type of [`HttpMetrics::render`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RouteKey {
    method: String,
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SeriesKey {
    route: RouteKey,
    status: u16,
}

#[derive(Debug, Default, Clone)]
struct DurationHistogram {
    /// Cumulative: slot `i` counts observations `<= DURATION_BUCKETS[i]`.
    buckets: [u64; DURATION_BUCKETS.len()],
    sum: f64,
    count: u64,
}

impl DurationHistogram {
    fn observe(&mut self, seconds: f64) {
        for (bound, slot) in DURATION_BUCKETS.iter().zip(self.buckets.iter_mut()) {
            if seconds <= *bound {
                *slot += 1;
            }
        }
        self.sum += seconds;
        self.count += 1;
    }
}

#[derive(Debug)]
pub struct HttpMetrics {
    namespace: String,
    in_flight: Mutex<BTreeMap<RouteKey, i64>>,
    completed: Mutex<BTreeMap<SeriesKey, DurationHistogram>>,
}

/// Decrements the in-flight gauge when dropped, including on unwind.
#[must_use]
pub struct InFlight<'a> {
    metrics: &'a HttpMetrics,
    key: RouteKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(n) = self.metrics.in_flight.lock().get_mut(&self.key) {
            *n -= 1;
        }
    }
}

impl HttpMetrics {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
            in_flight: Mutex::new(BTreeMap::new()),
            completed: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn start(&self, method: &str, path: &str) -> InFlight<'_> {
        let key = RouteKey {
            method: method.to_owned(),
            path: path.to_owned(),
        };
        *self.in_flight.lock().entry(key.clone()).or_insert(0) += 1;
        InFlight { metrics: self, key }
    }

    pub fn record(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let key = SeriesKey {
            route: RouteKey {
                method: method.to_owned(),
                path: path.to_owned(),
            },
            status,
        };
        self.completed
            .lock()
            .entry(key)
            .or_default()
            .observe(elapsed.as_secs_f64());
    }

    /// Number of completed requests for one series.
    pub fn request_count(&self, method: &str, path: &str, status: u16) -> u64 {
        let key = SeriesKey {
            route: RouteKey {
                method: method.to_owned(),
                path: path.to_owned(),
            },
            status,
        };
        self.completed.lock().get(&key).map_or(0, |h| h.count)
    }

    pub fn render(&self) -> String {
        let ns = &self.namespace;
        let completed = self.completed.lock().clone();
        let in_flight = self.in_flight.lock().clone();
        let mut out = String::new();

        out.push_str(&format!(
            "# HELP {ns}_http_requests_total Total number of HTTP requests.\n\
             # TYPE {ns}_http_requests_total counter\n"
        ));
        for (key, hist) in &completed {
            out.push_str(&format!(
                "{ns}_http_requests_total{{{}}} {}\n",
                series_labels(key),
                hist.count
            ));
        }

        out.push_str(&format!(
            "# HELP {ns}_http_request_duration_seconds Duration of HTTP requests in seconds.\n\
             # TYPE {ns}_http_request_duration_seconds histogram\n"
        ));
        for (key, hist) in &completed {
            let labels = series_labels(key);
            for (bound, n) in DURATION_BUCKETS.iter().zip(hist.buckets.iter()) {
                out.push_str(&format!(
                    "{ns}_http_request_duration_seconds_bucket{{{labels},le=\"{bound}\"}} {n}\n"
                ));
            }
            out.push_str(&format!(
                "{ns}_http_request_duration_seconds_bucket{{{labels},le=\"+Inf\"}} {}\n\
                 {ns}_http_request_duration_seconds_sum{{{labels}}} {}\n\
                 {ns}_http_request_duration_seconds_count{{{labels}}} {}\n",
                hist.count, hist.sum, hist.count
            ));
        }

        out.push_str(&format!(
            "# HELP {ns}_http_requests_in_flight Current number of HTTP requests being processed.\n\
             # TYPE {ns}_http_requests_in_flight gauge\n"
        ));
        for (key, n) in &in_flight {
            out.push_str(&format!(
                "{ns}_http_requests_in_flight{{{}}} {n}\n",
                route_labels(key)
            ));
        }

        out
    }
}

fn route_labels(key: &RouteKey) -> String {
    format!(
        "method=\"{}\",path=\"{}\"",
        escape(&key.method),
        escape(&key.path)
    )
}

fn series_labels(key: &SeriesKey) -> String {
    format!("{},status=\"{}\"", route_labels(&key.route), key.status)
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
