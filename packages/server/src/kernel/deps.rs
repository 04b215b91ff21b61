//! External collaborators of the scan workflow (using traits for testability)
//!
//! The workflow talks to the upstream mail API and the audio layer through
//! these seams so tests can substitute deterministic fakes.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;

use crate::domains::scanning::letter_id::LetterId;

// =============================================================================
// Upstream gateway
// =============================================================================

/// Transport-level failure talking to the upstream mail service.
///
/// Non-2xx responses are not errors at this seam; they come back in
/// [`MarkResult`] so the workflow can branch on the status code.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
}

/// Outcome of a mark-mailed call that reached the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkResult {
    pub ok: bool,
    pub status: u16,
}

/// The two upstream operations the workflow needs.
#[async_trait]
pub trait MailGateway: Send + Sync {
    /// Issue the mark-mailed mutation. Errors only on transport failure.
    async fn mark_mailed(&self, api_key: &str, id: &LetterId) -> Result<MarkResult, GatewayError>;

    /// Fetch the letter's current remote status, `Ok(None)` when unknown
    /// (non-2xx or unparseable body). Transport failure is an error here
    /// too — the caller must report it, not guess from the status code.
    async fn letter_status(
        &self,
        api_key: &str,
        id: &LetterId,
    ) -> Result<Option<String>, GatewayError>;
}

/// Wrapper around the hcmail client that implements the MailGateway trait
pub struct HcMailAdapter(pub Arc<hcmail::MailApiClient>);

impl HcMailAdapter {
    pub fn new(client: Arc<hcmail::MailApiClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl MailGateway for HcMailAdapter {
    async fn mark_mailed(&self, api_key: &str, id: &LetterId) -> Result<MarkResult, GatewayError> {
        let resp = self
            .0
            .mark_mailed(api_key, id.as_str())
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(MarkResult {
            ok: resp.ok,
            status: resp.status,
        })
    }

    async fn letter_status(
        &self,
        api_key: &str,
        id: &LetterId,
    ) -> Result<Option<String>, GatewayError> {
        match self.0.letter_status(api_key, id.as_str()).await {
            Ok(letter) => Ok(letter.map(|l| l.status)),
            Err(e) => Err(GatewayError::Network(e.to_string())),
        }
    }
}

// =============================================================================
// Audio cues
// =============================================================================

/// Named audio cues played once per scan outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Success,
    Duplicate,
    Error,
}

/// Best-effort audio feedback. No contract beyond "try to make the sound".
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// No-op player for tests and headless deployments.
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&self, _cue: Cue) {}
}

/// Terminal-bell player for the scan station: one bell for success, two for
/// a duplicate, three for an error.
pub struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&self, cue: Cue) {
        let bells: &[u8] = match cue {
            Cue::Success => b"\x07",
            Cue::Duplicate => b"\x07\x07",
            Cue::Error => b"\x07\x07\x07",
        };
        let mut out = std::io::stdout();
        if out.write_all(bells).and_then(|()| out.flush()).is_err() {
            tracing::warn!("failed to play audio cue");
        }
    }
}
