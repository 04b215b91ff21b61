use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Embed the scanner web bundle at compile time.
// Build the bundle into packages/server/static before building the server.
#[derive(RustEmbed)]
#[folder = "static"]
pub struct ScannerAssets;

/// Serve the scanner bundle with SPA fallback.
///
/// A path containing a `.` that matches no asset is a missing file, not a
/// client route — it gets a 404 rather than the fallback document, so a
/// broken asset reference fails loudly instead of loading index.html as
/// JavaScript.
pub async fn serve_scanner(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match ScannerAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None if path.contains('.') => (StatusCode::NOT_FOUND, "Not found").into_response(),
        None => match ScannerAssets::get("index.html") {
            Some(content) => {
                ([(header::CONTENT_TYPE, "text/html")], content.data).into_response()
            }
            None => (StatusCode::NOT_FOUND, "Not found").into_response(),
        },
    }
}
