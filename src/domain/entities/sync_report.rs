use serde::{Deserialize, Serialize};

/// Aggregate result of one drain pass. Ephemeral: produced for the single
/// end-of-pass notification, never used for correctness decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub mutations_attempted: u32,
    pub mutations_synced: u32,
    pub mutations_failed: u32,
    pub photos_attempted: u32,
    pub photos_synced: u32,
    pub photos_failed: u32,
}

impl SyncReport {
    /// A pass that found nothing eligible emits no notification.
    pub fn is_empty(&self) -> bool {
        self.mutations_attempted == 0 && self.photos_attempted == 0
    }

    pub fn synced_anything(&self) -> bool {
        self.mutations_synced > 0 || self.photos_synced > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} modification(s), {} photo(s) synchronisée(s)",
            self.mutations_synced, self.photos_synced
        )
    }
}
