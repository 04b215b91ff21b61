//! The scan-to-mark state machine.
//!
//! One decoded-barcode event at a time: classify, deduplicate, mark mailed
//! upstream exactly once, interpret the result. The core concurrency
//! invariant lives here: at most one upstream mutation is in flight, and
//! scans arriving while one is outstanding are dropped, not queued —
//! camera scanners re-fire on the same physical barcode several times a
//! second, and buffering those would mean duplicate mutations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::history::{HistoryEntry, RecordStatus};
use super::letter_id::{extract_api_key, LetterId};
use super::state::{SessionStore, Status, Transition};
use crate::kernel::deps::{Cue, CuePlayer, GatewayError, MailGateway};

/// How a duplicate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// Known to the local index; no upstream call was made.
    Local,
    /// Reported mailed by the upstream status round-trip (marked from
    /// another device, or history was cleared locally).
    Remote,
}

/// Terminal classification of one accepted scan attempt. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Success,
    Duplicate(DuplicateKind),
    InvalidCode,
    AuthError,
    PermissionError,
    UpstreamError(u16),
    NetworkError,
}

impl ScanOutcome {
    pub fn cue(self) -> Cue {
        match self {
            ScanOutcome::Success => Cue::Success,
            ScanOutcome::Duplicate(_) => Cue::Duplicate,
            _ => Cue::Error,
        }
    }

    fn status(self) -> Status {
        match self {
            ScanOutcome::Success => Status::Success,
            ScanOutcome::Duplicate(_) => Status::Duplicate,
            _ => Status::Error,
        }
    }

    fn message(self) -> String {
        match self {
            ScanOutcome::Success => "Successfully marked as mailed".to_string(),
            ScanOutcome::Duplicate(_) => "Letter already marked as mailed".to_string(),
            ScanOutcome::InvalidCode => "Not a letter code".to_string(),
            ScanOutcome::AuthError => "Invalid API key".to_string(),
            ScanOutcome::PermissionError => "Invalid letter or no permission".to_string(),
            ScanOutcome::UpstreamError(code) => format!("Error marking as mailed ({code})"),
            ScanOutcome::NetworkError => "Network error".to_string(),
        }
    }

    /// History record for this outcome, if one is appended.
    fn record(self, id: &LetterId) -> Option<HistoryEntry> {
        let (status, message) = match self {
            ScanOutcome::Success => (RecordStatus::Success, "Marked as mailed".to_string()),
            ScanOutcome::Duplicate(DuplicateKind::Local) => {
                (RecordStatus::Duplicate, "Already scanned".to_string())
            }
            ScanOutcome::Duplicate(DuplicateKind::Remote) => {
                (RecordStatus::Duplicate, "Already mailed".to_string())
            }
            ScanOutcome::AuthError => (RecordStatus::Error, "Invalid API key".to_string()),
            ScanOutcome::PermissionError => {
                (RecordStatus::Error, "Invalid letter or no permission".to_string())
            }
            ScanOutcome::UpstreamError(code) => (RecordStatus::Error, format!("HTTP {code}")),
            ScanOutcome::NetworkError => (RecordStatus::Error, "Network error".to_string()),
            // Invalid scans never reach history.
            ScanOutcome::InvalidCode => return None,
        };
        Some(HistoryEntry::now(id.clone(), status, message))
    }

    fn into_transition(self, id: LetterId) -> Transition {
        let remember = matches!(
            self,
            ScanOutcome::Success | ScanOutcome::Duplicate(DuplicateKind::Remote)
        );
        Transition {
            status: self.status(),
            message: self.message(),
            record: self.record(&id),
            index_id: remember.then(|| id.clone()),
            letter_id: Some(id),
        }
    }
}

/// Releases the in-flight guard on every exit path, panics included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The workflow itself: one instance per session, shareable across tasks.
pub struct ScanWorkflow {
    session: Arc<SessionStore>,
    gateway: Arc<dyn MailGateway>,
    cues: Arc<dyn CuePlayer>,
    in_flight: AtomicBool,
}

impl ScanWorkflow {
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<dyn MailGateway>,
        cues: Arc<dyn CuePlayer>,
    ) -> Self {
        Self {
            session,
            gateway,
            cues,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Handle one decoded-barcode event.
    ///
    /// Returns the applied transition, or `None` when the scan was silently
    /// dropped because another one is in flight.
    pub async fn handle_scan(&self, raw: &str) -> Option<Transition> {
        // Credential transfers bypass all letter logic, including the
        // in-flight guard.
        if let Some(api_key) = extract_api_key(raw) {
            tracing::info!("API key updated via scan");
            self.session.set_api_key(api_key).await;
            self.cues.play(Cue::Success);
            let transition = Transition::status_only(Status::CredentialUpdated, "API key updated");
            self.session.apply(transition.clone()).await;
            return Some(transition);
        }

        if self.in_flight.load(Ordering::Acquire) {
            tracing::debug!("scan dropped, another scan is in flight");
            return None;
        }

        let Some(id) = LetterId::extract(raw) else {
            // No history entry for garbage input, and the guard was never
            // engaged on this path.
            self.cues.play(Cue::Error);
            let transition = Transition::status_only(Status::Error, "Not a letter code");
            self.session.apply(transition.clone()).await;
            return Some(transition);
        };

        if self.session.is_known(&id).await {
            return Some(self.conclude(ScanOutcome::Duplicate(DuplicateKind::Local), id).await);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.session.apply(Transition::processing(&id)).await;
        let api_key = self.session.api_key().await;

        let outcome = match self.gateway.mark_mailed(&api_key, &id).await {
            Err(GatewayError::Network(reason)) => {
                tracing::warn!(letter = %id, %reason, "mark-mailed transport failure");
                ScanOutcome::NetworkError
            }
            Ok(result) if result.ok => ScanOutcome::Success,
            Ok(result) => {
                // Non-2xx: ask for the letter's status to tell a
                // cross-device duplicate apart from a hard error.
                match self.gateway.letter_status(&api_key, &id).await {
                    Err(GatewayError::Network(reason)) => {
                        tracing::warn!(letter = %id, %reason, "status check transport failure");
                        ScanOutcome::NetworkError
                    }
                    Ok(status) => match status.as_deref() {
                        Some("mailed") => ScanOutcome::Duplicate(DuplicateKind::Remote),
                        _ => match result.status {
                            401 => ScanOutcome::AuthError,
                            404 => ScanOutcome::PermissionError,
                            code => ScanOutcome::UpstreamError(code),
                        },
                    },
                }
            }
        };

        Some(self.conclude(outcome, id).await)
    }

    async fn conclude(&self, outcome: ScanOutcome, id: LetterId) -> Transition {
        tracing::info!(letter = %id, ?outcome, "scan resolved");
        self.cues.play(outcome.cue());
        let transition = outcome.into_transition(id);
        self.session.apply(transition.clone()).await;
        transition
    }
}
