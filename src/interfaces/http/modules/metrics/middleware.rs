//! HTTP request metrics middleware
//!
//! Records `http_requests_total` and `http_request_duration_seconds` per
//! matched route. Market document submissions are also counted in
//! `market_documents_total` by outcome, so rejected processes show up
//! separately from malformed requests.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status();

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => route.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => route.clone()
    )
    .record(elapsed);

    if is_market_document(&method, &route) {
        metrics::counter!(
            "market_documents_total",
            "path" => route,
            "outcome" => document_outcome(status)
        )
        .increment(1);
    }

    response
}

/// Writes under `/api/v1/metering-points` start a business process.
fn is_market_document(method: &Method, route: &str) -> bool {
    (method == Method::POST || method == Method::PUT)
        && route.starts_with("/api/v1/metering-points")
}

fn document_outcome(status: StatusCode) -> &'static str {
    match status {
        s if s.is_success() => "accepted",
        StatusCode::UNPROCESSABLE_ENTITY => "rejected",
        s if s.is_client_error() => "malformed",
        _ => "error",
    }
}
