use axum::{
    body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response,
};
use uuid::Uuid;

/// HTTP header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request correlation ID, stored in the request extensions
#[derive(Clone, Copy, Debug)]
pub struct RequestId(Uuid);

impl RequestId {
    fn from_header(request: &Request) -> Option<Self> {
        let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Attaches a request ID to every request and echoes it on the response.
///
/// A valid incoming `x-request-id` header is reused so IDs survive proxy
/// hops; anything else gets a fresh UUID v4.
pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let request_id =
        RequestId::from_header(&request).unwrap_or_else(|| RequestId(Uuid::new_v4()));

    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Span factory for the HTTP trace layer, carrying the request ID
pub fn trace_span_for(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| "unknown".to_string(), |id| id.to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
