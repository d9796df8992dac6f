use crate::domain::value_objects::{EntryId, EntryStatus, PhotoKind, ResourceRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One pending photo upload. The staged file referenced by `staged_path` is
/// owned by this entry: it is only removed on confirmed upload or explicit
/// user deletion, never by the OS picker cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedPhoto {
    pub id: EntryId,
    /// Element or compteur the photo attaches to. May still be a local
    /// placeholder if the target itself was created offline.
    pub target: ResourceRef,
    pub kind: PhotoKind,
    pub staged_path: PathBuf,
    pub caption: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Display order within the target entity, 1-based, kept dense.
    pub ordinal: u32,
    pub status: EntryStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoMetadata {
    pub caption: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl QueuedPhoto {
    pub fn new(
        id: EntryId,
        target: ResourceRef,
        kind: PhotoKind,
        staged_path: PathBuf,
        ordinal: u32,
        metadata: PhotoMetadata,
    ) -> Self {
        Self {
            id,
            target,
            kind,
            staged_path,
            caption: metadata.caption,
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            ordinal,
            status: EntryStatus::Pending,
            retry_count: 0,
            created_at: Utc::now(),
            last_error: None,
        }
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = EntryStatus::Failed;
        self.retry_count += 1;
        self.last_error = Some(error.into());
    }

    /// Copy with the durable form of the status, for persistence snapshots.
    pub fn durable(&self) -> QueuedPhoto {
        let mut copy = self.clone();
        copy.status = self.status.durable();
        copy
    }
}
