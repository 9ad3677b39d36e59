//! HTTP 中间件
//!
//! 请求级 span 与请求指标。指标的 `path` 标签取路由模板（如 `/api/rules/{id}/delete`），
//! 而不是实际 URI，保证 Prometheus 序列数量只随路由数量增长。

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, field};

use super::metrics;

/// 未匹配任何路由的请求共用的标签
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// 请求对应的路由模板
///
/// 只有通过 `Router::layer` 挂载时路由信息才可用，否则归入 [`UNMATCHED_ROUTE`]。
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// HTTP 请求追踪和指标中间件
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", rule_routes())
///     .layer(middleware::from_fn(http_tracing));
/// ```
pub async fn http_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = route_label(&request);

    let span = tracing::info_span!(
        "http_request",
        %method,
        route = %route,
        uri = %request.uri().path(),
        status = field::Empty,
        latency_ms = field::Empty,
    );

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let elapsed = start.elapsed();

    let status = response.status().as_u16();
    span.record("status", status);
    span.record("latency_ms", elapsed.as_millis() as u64);

    metrics::record_http_request(method.as_str(), &route, status, elapsed.as_secs_f64());

    response
}
