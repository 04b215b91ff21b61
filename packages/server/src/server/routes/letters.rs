//! The letter proxy: credential pass-through to the upstream mail API.
//!
//! The browser bundle cannot call the upstream directly (CORS), so these
//! two routes forward with the caller's bearer header and relay the
//! upstream response verbatim. Nothing here interprets outcomes — that is
//! the scan workflow's job on the client side of this hop.

use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use regex::Regex;

use crate::server::app::AppState;

lazy_static! {
    /// Characters a letter id may carry on the wire. Anything else — path
    /// tricks included — is rejected before we build an upstream URL.
    static ref ID_RE: Regex = Regex::new(r"^[A-Za-z0-9!_-]{1,64}$").unwrap();
}

/// GET /api/letters/{id} — relay the letter's current upstream state.
pub async fn get_letter_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    proxy_letter(&state, reqwest::Method::GET, &id, &headers, "").await
}

/// POST /api/letters/{id}/mark_mailed — relay the mark-mailed mutation.
pub async fn mark_mailed_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    proxy_letter(&state, reqwest::Method::POST, &id, &headers, "/mark_mailed").await
}

async fn proxy_letter(
    state: &AppState,
    method: reqwest::Method,
    id: &str,
    headers: &HeaderMap,
    suffix: &str,
) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let auth = match auth {
        Some(value) if value.starts_with("Bearer ") => value,
        _ => return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    };

    if !ID_RE.is_match(id) {
        return (StatusCode::BAD_REQUEST, "Invalid id").into_response();
    }

    // Charset is validated above, so the id embeds into the path as-is.
    let url = format!("{}/api/v1/letters/{}{}", state.upstream_base, id, suffix);

    let result = state
        .http
        .request(method, &url)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, "application/json")
        .send()
        .await;

    let resp = match result {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, %url, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, "Upstream error").into_response();
        }
    };

    let status =
        StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    match resp.bytes().await {
        Ok(body) => (status, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %url, "failed to read upstream body");
            (StatusCode::BAD_GATEWAY, "Upstream error").into_response()
        }
    }
}
