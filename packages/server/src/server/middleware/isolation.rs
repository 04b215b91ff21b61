use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Cross-origin isolation middleware
///
/// The barcode-decoding worker in the browser bundle needs
/// `SharedArrayBuffer`, which browsers only enable in a cross-origin
/// isolated context. These two headers must be present on every response —
/// assets, API and fallback alike.
pub async fn cross_origin_isolation(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("require-corp"),
    );
    response
}
