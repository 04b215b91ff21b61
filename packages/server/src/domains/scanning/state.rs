//! Session state: the single mutable object the UI renders from.
//!
//! All mutation goes through [`SessionStore::apply`]; render paths only see
//! snapshots. State lives behind one async mutex (the sanctioned
//! multi-threaded variant of the single-event-loop model), never held
//! across upstream awaits.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::dedup::DedupIndex;
use super::history::HistoryEntry;
use super::letter_id::LetterId;
use crate::kernel::storage::FileStore;

/// How long a success outcome stays on screen before reverting to idle.
pub const SUCCESS_RESET: Duration = Duration::from_millis(800);

/// How long the other transient outcomes stay on screen.
pub const TRANSIENT_RESET: Duration = Duration::from_millis(5000);

const IDLE_MESSAGE: &str = "Ready to scan";

/// Current UI status. `Idle` and `Processing` persist; the rest are
/// transient display states that auto-revert to idle unless preempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Idle,
    Processing,
    Success,
    Error,
    Duplicate,
    CredentialUpdated,
}

impl Status {
    /// Delay before this status auto-reverts to idle, if transient.
    fn reset_after(self) -> Option<Duration> {
        match self {
            Status::Success => Some(SUCCESS_RESET),
            Status::Error | Status::Duplicate | Status::CredentialUpdated => {
                Some(TRANSIENT_RESET)
            }
            Status::Idle | Status::Processing => None,
        }
    }
}

/// One state change emitted by the workflow.
#[derive(Debug, Clone)]
pub struct Transition {
    pub status: Status,
    pub message: String,
    pub letter_id: Option<LetterId>,
    /// History entry to append, if this transition records one.
    pub record: Option<HistoryEntry>,
    /// Id to add to the dedup index (set on success and on a duplicate
    /// discovered through the remote status round-trip).
    pub index_id: Option<LetterId>,
}

impl Transition {
    /// A transition that only changes the displayed status and message.
    pub fn status_only(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            letter_id: None,
            record: None,
            index_id: None,
        }
    }

    pub fn processing(id: &LetterId) -> Self {
        Self {
            status: Status::Processing,
            message: "Processing...".to_string(),
            letter_id: Some(id.clone()),
            record: None,
            index_id: None,
        }
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: Status,
    pub api_key: String,
    pub last_letter_id: Option<LetterId>,
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

struct SessionInner {
    status: Status,
    api_key: String,
    last_letter_id: Option<LetterId>,
    message: String,
    history: Vec<HistoryEntry>,
    dedup: DedupIndex,
}

/// Owner of the session state, dedup index and persistence handle.
pub struct SessionStore {
    inner: Arc<Mutex<SessionInner>>,
    /// The single pending auto-reset task. Replaced, never stacked.
    reset: Mutex<Option<JoinHandle<()>>>,
    store: FileStore,
}

impl SessionStore {
    /// Rehydrate a session from persisted state: API key, history, and the
    /// dedup index rebuilt from the history's success entries.
    pub fn load(store: FileStore) -> Self {
        let api_key = store.load_api_key().unwrap_or_default();
        let history = store.load_history();
        let dedup = DedupIndex::rebuild(&history);
        tracing::info!(
            history = history.len(),
            known_ids = dedup.len(),
            "session restored"
        );

        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                status: Status::Idle,
                api_key,
                last_letter_id: None,
                message: IDLE_MESSAGE.to_string(),
                history,
                dedup,
            })),
            reset: Mutex::new(None),
            store,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().await;
        SessionSnapshot {
            status: inner.status,
            api_key: inner.api_key.clone(),
            last_letter_id: inner.last_letter_id.clone(),
            message: inner.message.clone(),
            history: inner.history.clone(),
        }
    }

    pub async fn api_key(&self) -> String {
        self.inner.lock().await.api_key.clone()
    }

    pub async fn has_api_key(&self) -> bool {
        !self.inner.lock().await.api_key.is_empty()
    }

    pub async fn is_known(&self, id: &LetterId) -> bool {
        self.inner.lock().await.dedup.contains(id)
    }

    /// Store a captured credential, overwriting any previous one.
    pub async fn set_api_key(&self, api_key: &str) {
        self.inner.lock().await.api_key = api_key.to_string();
        self.store.save_api_key(api_key);
    }

    /// Apply a workflow transition: update the displayed state, append any
    /// history record, update the index, persist, and (re)schedule the
    /// auto-reset for transient statuses. Any previously pending reset is
    /// cancelled first.
    pub async fn apply(&self, transition: Transition) {
        if let Some(pending) = self.reset.lock().await.take() {
            pending.abort();
        }

        {
            let mut inner = self.inner.lock().await;
            inner.status = transition.status;
            inner.message = transition.message;
            inner.last_letter_id = transition.letter_id;

            if let Some(id) = transition.index_id {
                inner.dedup.add(id);
            }
            if let Some(entry) = transition.record {
                inner.history.push(entry);
                self.store.save_history(&inner.history);
            }
        }

        if let Some(delay) = transition.status.reset_after() {
            let inner = Arc::clone(&self.inner);
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let mut inner = inner.lock().await;
                inner.status = Status::Idle;
                inner.message = IDLE_MESSAGE.to_string();
            });
            *self.reset.lock().await = Some(handle);
        }
    }

    /// Empty the history and the dedup index together — the index must never
    /// hold an id absent from history after a clear.
    pub async fn clear_history(&self) {
        let mut inner = self.inner.lock().await;
        inner.history.clear();
        inner.dedup.clear();
        self.store.save_history(&inner.history);
    }
}
