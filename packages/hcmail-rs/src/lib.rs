//! Hack Club Mail REST API client.
//!
//! A minimal client for the two letter operations the scan station needs:
//! marking a letter mailed and fetching its current status. Both carry the
//! API key as a bearer header and time out after ten seconds — a hung
//! upstream must never block a scan indefinitely.
//!
//! # Example
//!
//! ```rust,ignore
//! use hcmail::MailApiClient;
//!
//! let client = MailApiClient::new("https://mail.hackclub.com")?;
//!
//! let result = client.mark_mailed(api_key, "ltr!ab12cd").await?;
//! if !result.ok {
//!     println!("upstream said {}", result.status);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{HcMailError, Result};
pub use types::{Letter, LetterResponse, MarkMailed};

use std::time::Duration;

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://mail.hackclub.com";

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MailApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MailApiClient {
    /// Build a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HcMailError::InvalidBaseUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// POST `/api/v1/letters/{id}/mark_mailed`.
    ///
    /// Returns `ok: false` with the numeric status on any non-2xx response
    /// so the caller can branch; errors only on transport failure.
    pub async fn mark_mailed(&self, api_key: &str, letter_id: &str) -> Result<MarkMailed> {
        let url = format!(
            "{}/api/v1/letters/{}/mark_mailed",
            self.base_url,
            urlencoding::encode(letter_id)
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .send()
            .await?;

        let status = resp.status();
        Ok(MarkMailed {
            ok: status.is_success(),
            status: status.as_u16(),
        })
    }

    /// GET `/api/v1/letters/{id}`.
    ///
    /// Returns `Ok(None)` on any non-2xx response or unparseable body —
    /// "unknown" is not fatal here, the caller treats it as inconclusive.
    pub async fn letter_status(&self, api_key: &str, letter_id: &str) -> Result<Option<Letter>> {
        let url = format!(
            "{}/api/v1/letters/{}",
            self.base_url,
            urlencoding::encode(letter_id)
        );

        let resp = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        match resp.json::<LetterResponse>().await {
            Ok(body) => Ok(Some(body.letter)),
            Err(_) => Ok(None),
        }
    }
}
