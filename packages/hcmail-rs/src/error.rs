use thiserror::Error;

/// Errors from the Hack Club Mail API client.
///
/// Non-2xx responses from `mark_mailed` are NOT errors — callers branch on
/// the returned status code. Only transport-level failures (timeout, DNS,
/// connection reset) surface here.
#[derive(Error, Debug)]
pub enum HcMailError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, HcMailError>;
