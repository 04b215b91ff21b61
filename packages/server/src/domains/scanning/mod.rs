//! The scan-to-mark workflow: letter-id extraction, duplicate detection,
//! session state, and the state machine that drives one upstream mutation
//! per newly scanned letter.

pub mod dedup;
pub mod history;
pub mod letter_id;
pub mod state;
pub mod workflow;

pub use dedup::DedupIndex;
pub use history::{HistoryEntry, RecordStatus, MAX_HISTORY};
pub use letter_id::{extract_api_key, LetterId, API_KEY_PREFIX};
pub use state::{SessionSnapshot, SessionStore, Status, Transition};
pub use workflow::{DuplicateKind, ScanOutcome, ScanWorkflow};
