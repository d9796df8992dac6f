use serde::{Deserialize, Serialize};

/// Per-entry state published to the UI status stream (spinner, error icon,
/// checkmark). Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Pending,
    Uploading,
    Failed,
    Uploaded,
}

impl UploadState {
    pub fn as_str(&self) -> &str {
        match self {
            UploadState::Pending => "pending",
            UploadState::Uploading => "uploading",
            UploadState::Failed => "failed",
            UploadState::Uploaded => "uploaded",
        }
    }
}
