//! Request observation middleware
//!
//! Logs one line per request with method, path, status and latency.
//! 404s are ordinary outcomes and logged like successes.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::{Event, Logger, Severity};

pub async fn observe_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let (severity, event) = if status.is_server_error() {
        (Severity::Warn, Event::RequestComplete)
    } else if status.is_client_error() && status.as_u16() != 404 {
        (Severity::Info, Event::RequestRejected)
    } else {
        (Severity::Info, Event::RequestComplete)
    };

    let elapsed_ms = started.elapsed().as_millis().to_string();
    Logger::log(
        severity,
        event,
        &[
            ("duration_ms", &elapsed_ms),
            ("method", method.as_str()),
            ("path", &path),
            ("status", status.as_str()),
        ],
    );

    response
}
