use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Copies captured photos into an app-owned location so the original
/// (typically a volatile picker cache file) can disappear without losing the
/// pending upload.
#[async_trait]
pub trait PhotoStager: Send + Sync {
    /// Copies (never moves) the source into the staging directory, keyed by
    /// the entry id and the source extension. Staging the same id twice
    /// overwrites.
    async fn stage(&self, source: &Path, id: &EntryId) -> Result<PathBuf, AppError>;

    /// Removes the staged file for the entry, if any.
    async fn unstage(&self, id: &EntryId) -> Result<(), AppError>;

    /// Re-derives the staged path by probing known extensions.
    async fn locate(&self, id: &EntryId) -> Option<PathBuf>;
}
