use crate::domain::entities::SyncReport;
use crate::domain::value_objects::{EntryId, UploadState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    Mutations,
    Photos,
}

/// Everything the UI layer hears from the engine: one aggregate toast per
/// completed pass, a standing badge for entries needing attention, and a
/// per-entry state stream for inline indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncNotification {
    PassCompleted { report: SyncReport, message: String },
    EntryState { id: EntryId, state: UploadState },
    NeedsAttention {
        id: EntryId,
        queue: QueueKind,
        reason: String,
    },
    SessionExpired,
}

pub trait SyncNotifier: Send + Sync {
    fn notify(&self, notification: SyncNotification);
}
