//! HTTP request/response tracing layer.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates the per-request tracing layer.
///
/// Opens an `INFO` span with method, URI and version for each request and
/// logs status and latency (ms) when the response is produced. Guard
/// short-circuits are logged inside this span at `DEBUG`.
///
/// ```text
/// INFO request{method=POST uri=/users/register version=HTTP/1.1}: finished processing request latency=3 ms status=201
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
