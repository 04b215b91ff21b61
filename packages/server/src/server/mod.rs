// HTTP reverse proxy (Axum)
pub mod app;
pub mod middleware;
pub mod routes;
pub mod static_files;

pub use app::*;
