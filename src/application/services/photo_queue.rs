use crate::application::ports::{EntryStore, PhotoStager, PHOTO_QUEUE_KEY};
use crate::domain::entities::{PhotoMetadata, QueuedPhoto};
use crate::domain::value_objects::{EntryId, EntryStatus, PhotoKind, ResourceRef};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Ordered collection of pending photo uploads, backed by the durable entry
/// store, owning the staged file lifecycle. Staged files are removed only on
/// confirmed upload or explicit user deletion.
pub struct PhotoQueueService {
    store: Arc<dyn EntryStore>,
    stager: Arc<dyn PhotoStager>,
    entries: RwLock<Vec<QueuedPhoto>>,
    dirty: AtomicBool,
}

impl PhotoQueueService {
    pub async fn restore(store: Arc<dyn EntryStore>, stager: Arc<dyn PhotoStager>) -> Self {
        let mut entries = match store.load(PHOTO_QUEUE_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<QueuedPhoto>>(&payload) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("discarding unreadable photo queue: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("failed to load photo queue: {err}");
                Vec::new()
            }
        };
        for photo in &mut entries {
            photo.status = photo.status.durable();
            // The staging dir may have moved between installs; re-derive the
            // path from the id rather than trusting the persisted one.
            if !photo.staged_path.exists() {
                match stager.locate(&photo.id).await {
                    Some(path) => photo.staged_path = path,
                    None => warn!(
                        "staged file missing for queued photo {} ({})",
                        photo.id,
                        photo.staged_path.display()
                    ),
                }
            }
        }
        debug!("restored {} queued photo(s)", entries.len());
        Self {
            store,
            stager,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    /// Stages the captured file, then appends the entry and persists
    /// immediately. A staging failure aborts the enqueue for this one photo
    /// and is surfaced to the caller at capture time, not deferred.
    pub async fn enqueue(
        &self,
        source: &Path,
        target: ResourceRef,
        kind: PhotoKind,
        metadata: PhotoMetadata,
    ) -> crate::shared::Result<QueuedPhoto> {
        let id = EntryId::generate();
        let staged_path = self.stager.stage(source, &id).await?;

        let photo = {
            let mut entries = self.entries.write().await;
            let ordinal = entries
                .iter()
                .filter(|p| p.target == target && p.kind == kind)
                .count() as u32
                + 1;
            let photo = QueuedPhoto::new(id, target, kind, staged_path, ordinal, metadata);
            match entries.iter().position(|p| p.id == photo.id) {
                Some(index) => entries[index] = photo.clone(),
                None => entries.push(photo.clone()),
            }
            photo
        };
        self.persist_now().await;
        Ok(photo)
    }

    /// Removes the entry and frees its staged file after a confirmed upload.
    /// Ordinals of remaining entries are untouched: the server already holds
    /// the uploaded photo at its ordinal.
    pub async fn dequeue_on_success(&self, id: &EntryId) {
        {
            let mut entries = self.entries.write().await;
            entries.retain(|p| &p.id != id);
        }
        if let Err(err) = self.stager.unstage(id).await {
            warn!("failed to unstage photo {id}: {err}");
        }
        self.dirty.store(true, Ordering::Release);
    }

    /// Explicit user deletion: removes entry and staged file, then compacts
    /// the ordinals of the remaining photos on the same target back to a
    /// dense 1..N range.
    pub async fn remove(&self, id: &EntryId) -> bool {
        let removed = {
            let mut entries = self.entries.write().await;
            let Some(index) = entries.iter().position(|p| &p.id == id) else {
                return false;
            };
            let removed = entries.remove(index);
            let mut same_target: Vec<&mut QueuedPhoto> = entries
                .iter_mut()
                .filter(|p| p.target == removed.target && p.kind == removed.kind)
                .collect();
            same_target.sort_by_key(|p| p.ordinal);
            for (position, photo) in same_target.into_iter().enumerate() {
                photo.ordinal = position as u32 + 1;
            }
            removed
        };
        if let Err(err) = self.stager.unstage(&removed.id).await {
            warn!("failed to unstage photo {}: {err}", removed.id);
        }
        self.persist_now().await;
        true
    }

    pub async fn mark_failed(&self, id: &EntryId, error: &str) {
        let mut entries = self.entries.write().await;
        if let Some(photo) = entries.iter_mut().find(|p| &p.id == id) {
            photo.mark_failed(error);
            self.dirty.store(true, Ordering::Release);
        }
    }

    pub async fn set_uploading(&self, id: &EntryId) {
        let mut entries = self.entries.write().await;
        if let Some(photo) = entries.iter_mut().find(|p| &p.id == id) {
            photo.status = EntryStatus::Uploading;
        }
    }

    /// Drain candidates: pending and failed, in queue order. Entries whose
    /// upload is already in flight are excluded so a reconnect cannot start
    /// a duplicate attempt.
    pub async fn pending_and_failed(&self) -> Vec<QueuedPhoto> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|p| p.status.is_drainable())
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &EntryId) -> Option<QueuedPhoto> {
        self.entries.read().await.iter().find(|p| &p.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<QueuedPhoto> {
        self.entries.read().await.clone()
    }

    /// Photos can point at an element or compteur that was itself created
    /// offline; once its create is acknowledged the targets are rewritten
    /// here too, before the photo pass runs.
    pub async fn resolve_placeholder(&self, local_id: &str, server_id: &str) -> usize {
        let mut entries = self.entries.write().await;
        let mut touched = 0;
        for photo in entries.iter_mut() {
            if let Some(resolved) = photo.target.resolved(local_id, server_id) {
                photo.target = resolved;
                touched += 1;
            }
        }
        if touched > 0 {
            self.dirty.store(true, Ordering::Release);
        }
        touched
    }

    /// Immediate flush; failures are logged, the in-memory queue stays
    /// authoritative until the next successful write.
    pub async fn persist_now(&self) {
        let payload = {
            let entries = self.entries.read().await;
            let durable: Vec<QueuedPhoto> = entries.iter().map(|p| p.durable()).collect();
            match serde_json::to_string(&durable) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!("failed to serialize photo queue: {err}");
                    return;
                }
            }
        };
        self.dirty.store(false, Ordering::Release);
        if let Err(err) = self.store.save(PHOTO_QUEUE_KEY, &payload).await {
            warn!("failed to persist photo queue: {err}");
        }
    }

    pub fn spawn_flush(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let queue = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if queue.dirty.swap(false, Ordering::AcqRel) {
                    queue.persist_now().await;
                }
            }
        })
    }
}
