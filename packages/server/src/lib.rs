// Mailscan - volunteer scan station for mail fulfillment
//
// This crate provides the scan-to-mark workflow (classify a decoded barcode,
// deduplicate it, mark the letter mailed upstream exactly once, surface the
// outcome) plus the local reverse proxy the browser bundle talks to.
//
// The workflow core lives in domains/scanning/; external collaborators
// (upstream API, persistence, audio cues) are behind kernel/ seams.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
