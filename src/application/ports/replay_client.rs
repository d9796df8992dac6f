use crate::domain::entities::{MutationEntry, QueuedPhoto};
use async_trait::async_trait;

/// Classified result of one replay/upload attempt. Expected failure modes
/// never cross the boundary as errors; they come back as outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Server acknowledged the write. For creates, carries the
    /// server-assigned id later queued entries may need.
    Success { assigned_id: Option<String> },
    /// Transient failure (5xx, timeout, transport): worth re-attempting
    /// unchanged on the next pass.
    Retryable(String),
    /// Will not succeed without user intervention (4xx, missing token).
    /// The entry is kept queued regardless; fatal means "needs a human",
    /// not "delete the evidence".
    Fatal(String),
    /// The session is no longer valid. Kept distinct from `Fatal` so the
    /// shell can trigger its global logout side effect.
    AuthExpired,
}

impl ReplayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReplayOutcome::Success { .. })
    }
}

/// Byte-level progress of an in-flight photo upload (sent, total).
pub type ProgressHook = std::sync::Arc<dyn Fn(u64, u64) + Send + Sync>;

#[async_trait]
pub trait MutationReplayClient: Send + Sync {
    async fn replay(&self, entry: &MutationEntry) -> ReplayOutcome;
}

#[async_trait]
pub trait PhotoUploadClient: Send + Sync {
    async fn upload(&self, photo: &QueuedPhoto, progress: Option<ProgressHook>) -> ReplayOutcome;
}
