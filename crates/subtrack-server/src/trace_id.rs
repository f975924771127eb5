//! Per-request trace ids
//!
//! Every request gets a UUID trace id, carried in a span around the handler
//! and echoed back in the `X-Trace-ID` response header. An incoming
//! `X-Trace-ID` that parses as a UUID (e.g. from a load balancer) is kept.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceId(pub Uuid);

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TraceId {
    /// Upstream id from the request headers, if present and well formed
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(TRACE_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Self)
    }
}

/// Assign a trace id, log the request outcome inside its span
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let trace_id =
        TraceId::from_headers(request.headers()).unwrap_or_else(|| TraceId(Uuid::new_v4()));
    request.extensions_mut().insert(trace_id);

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", trace_id = %trace_id);
    let started = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Request handled"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }

    response
}
