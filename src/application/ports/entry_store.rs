use crate::shared::error::AppError;
use async_trait::async_trait;

/// String-keyed durable store for serialized queue collections. Writes must
/// be atomic per key: a crash mid-write leaves the previous value intact,
/// never a partial one.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn save(&self, key: &str, payload: &str) -> Result<(), AppError>;
}

/// Fixed store keys for the two queue collections.
pub const MUTATION_QUEUE_KEY: &str = "mutation_queue";
pub const PHOTO_QUEUE_KEY: &str = "photo_queue";
