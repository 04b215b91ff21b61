use std::collections::HashSet;

use super::history::{HistoryEntry, RecordStatus};
use super::letter_id::LetterId;

/// In-memory set of letter ids known locally to be already mailed.
///
/// Rebuilt from persisted history once at session start, then updated
/// incrementally — never re-scanned wholesale. Entries whose originating
/// history record was evicted by the capacity cap are deliberately kept:
/// dedup only needs to stop recent resubmission, so the set is an
/// approximation of history, not a strict projection of it.
#[derive(Debug, Default)]
pub struct DedupIndex {
    ids: HashSet<LetterId>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index from persisted history: every id with a success entry.
    pub fn rebuild(history: &[HistoryEntry]) -> Self {
        let ids = history
            .iter()
            .filter(|e| e.status == RecordStatus::Success)
            .map(|e| e.id.clone())
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &LetterId) -> bool {
        self.ids.contains(id)
    }

    pub fn add(&mut self, id: LetterId) {
        self.ids.insert(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
