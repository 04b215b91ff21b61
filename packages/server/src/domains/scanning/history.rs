use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::letter_id::LetterId;

/// Most recent entries kept when history is persisted (oldest dropped first).
pub const MAX_HISTORY: usize = 200;

/// Recorded outcome of one scan, as shown in the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
    Duplicate,
    Error,
}

/// One scan outcome in the append-only history log.
///
/// Entries are never mutated after creation; they leave the log only through
/// a full clear or capacity eviction on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: LetterId,
    pub status: RecordStatus,
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ts: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn now(id: LetterId, status: RecordStatus, message: impl Into<String>) -> Self {
        Self {
            id,
            status,
            message: message.into(),
            ts: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_status_lowercase_and_ts_as_millis() {
        let entry = HistoryEntry::now(
            LetterId::extract("ltr!ab12cd").unwrap(),
            RecordStatus::Success,
            "Marked as mailed",
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["id"], "ltr!ab12cd");
        assert!(json["ts"].is_i64());
    }

    #[test]
    fn round_trips_through_json() {
        let entry = HistoryEntry::now(
            LetterId::extract("ltr!xy99").unwrap(),
            RecordStatus::Duplicate,
            "Already scanned",
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.status, entry.status);
        assert_eq!(back.message, entry.message);
        assert_eq!(back.ts.timestamp_millis(), entry.ts.timestamp_millis());
    }
}
