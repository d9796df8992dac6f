use serde::{Deserialize, Serialize};

/// Durable status of a queued entry. `Uploading` exists only while a drain
/// pass is running; it is normalized back to `Pending` before persistence so
/// a crash mid-upload can never leave an entry stuck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Uploading,
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Uploading => "uploading",
            EntryStatus::Failed => "failed",
        }
    }

    /// Form of this status that is safe to write to disk.
    pub fn durable(&self) -> EntryStatus {
        match self {
            EntryStatus::Uploading => EntryStatus::Pending,
            other => other.clone(),
        }
    }

    /// Eligible for an automatic drain attempt on reconnect. Failed entries
    /// stay eligible indefinitely; only in-flight uploads are excluded.
    pub fn is_drainable(&self) -> bool {
        !matches!(self, EntryStatus::Uploading)
    }
}

impl From<&str> for EntryStatus {
    fn from(value: &str) -> Self {
        match value {
            "failed" => EntryStatus::Failed,
            // `uploading` never reaches disk, but tolerate it on load.
            _ => EntryStatus::Pending,
        }
    }
}
