use crate::application::ports::{EntryStore, MUTATION_QUEUE_KEY};
use crate::domain::entities::MutationEntry;
use crate::domain::value_objects::{EntryId, EntryStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Ordered collection of pending API write operations, backed by the durable
/// entry store. This service is the only writer of its collection; the
/// in-memory state is authoritative and the store is flushed behind it.
pub struct MutationQueueService {
    store: Arc<dyn EntryStore>,
    entries: RwLock<Vec<MutationEntry>>,
    dirty: AtomicBool,
}

impl MutationQueueService {
    /// Rebuilds the queue from the store. A corrupt collection is logged and
    /// dropped rather than blocking startup; an absent one is an empty queue.
    pub async fn restore(store: Arc<dyn EntryStore>) -> Self {
        let entries = match store.load(MUTATION_QUEUE_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<MutationEntry>>(&payload) {
                Ok(mut entries) => {
                    // `uploading` never reaches disk, but a stale status from
                    // an older build must not wedge the entry.
                    for entry in &mut entries {
                        entry.status = entry.status.durable();
                    }
                    entries
                }
                Err(err) => {
                    warn!("discarding unreadable mutation queue: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("failed to load mutation queue: {err}");
                Vec::new()
            }
        };
        debug!("restored {} queued mutation(s)", entries.len());
        Self {
            store,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    /// Appends the entry (or replaces an existing one with the same id, in
    /// place) and persists immediately. Never touches the network.
    pub async fn enqueue(&self, mut entry: MutationEntry) {
        entry.status = EntryStatus::Pending;
        entry.retry_count = 0;
        {
            let mut entries = self.entries.write().await;
            match entries.iter().position(|e| e.id == entry.id) {
                Some(index) => entries[index] = entry,
                None => entries.push(entry),
            }
        }
        self.persist_now().await;
    }

    /// Removes the entry after a confirmed server acknowledgement.
    pub async fn dequeue_on_success(&self, id: &EntryId) {
        let mut entries = self.entries.write().await;
        entries.retain(|e| &e.id != id);
        self.dirty.store(true, Ordering::Release);
    }

    /// Keeps the entry queued, flagged failed, with one more retry on the
    /// counter. There is no max-retry eviction: a failed write stays visible
    /// until the user retries or removes it.
    pub async fn mark_failed(&self, id: &EntryId, error: &str) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| &e.id == id) {
            entry.mark_failed(error);
            self.dirty.store(true, Ordering::Release);
        }
    }

    pub async fn set_uploading(&self, id: &EntryId) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| &e.id == id) {
            entry.status = EntryStatus::Uploading;
        }
    }

    /// User-initiated removal of a stuck entry.
    pub async fn remove(&self, id: &EntryId) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        let removed = entries.len() != before;
        drop(entries);
        if removed {
            self.persist_now().await;
        }
        removed
    }

    /// Drain candidates for a sync pass, in strict insertion order. Both
    /// pending and failed entries are eligible; only in-flight ones are not.
    pub async fn pending_and_failed(&self) -> Vec<MutationEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.status.is_drainable())
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &EntryId) -> Option<MutationEntry> {
        self.entries.read().await.iter().find(|e| &e.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<MutationEntry> {
        self.entries.read().await.clone()
    }

    /// Rewrites every queued entry still referencing the local placeholder so
    /// it carries the server-assigned id instead. Returns how many entries
    /// were touched.
    pub async fn resolve_placeholder(&self, local_id: &str, server_id: &str) -> usize {
        let mut entries = self.entries.write().await;
        let mut touched = 0;
        for entry in entries.iter_mut() {
            if entry.substitute_placeholder(local_id, server_id) {
                touched += 1;
            }
        }
        if touched > 0 {
            self.dirty.store(true, Ordering::Release);
        }
        touched
    }

    /// Writes the current collection to the store right away. Persistence
    /// failure is logged, never raised: the in-memory queue stays
    /// authoritative until the next successful flush.
    pub async fn persist_now(&self) {
        let payload = {
            let entries = self.entries.read().await;
            let durable: Vec<MutationEntry> = entries
                .iter()
                .map(|e| {
                    let mut copy = e.clone();
                    copy.status = e.status.durable();
                    copy
                })
                .collect();
            match serde_json::to_string(&durable) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!("failed to serialize mutation queue: {err}");
                    return;
                }
            }
        };
        self.dirty.store(false, Ordering::Release);
        if let Err(err) = self.store.save(MUTATION_QUEUE_KEY, &payload).await {
            warn!("failed to persist mutation queue: {err}");
        }
    }

    /// Coalescing background flush: status/retry churn during a drain pass is
    /// written at most once per interval instead of per mutation.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{MutationKind, MutationOperation, ResourceRef, ResourceType};
    use crate::infrastructure::storage::JsonFileStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_entry(resource: ResourceType, placeholder: &str) -> MutationEntry {
        MutationEntry::new(
            MutationOperation::create(resource, placeholder.to_string()),
            json!({"id": placeholder}),
        )
    }

    fn update_entry(resource: ResourceType, target: &str, payload: serde_json::Value) -> MutationEntry {
        MutationEntry::new(
            MutationOperation::new(
                MutationKind::Update,
                resource,
                ResourceRef::Local(target.to_string()),
            ),
            payload,
        )
    }

    async fn queue_in(dir: &TempDir) -> MutationQueueService {
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()));
        MutationQueueService::restore(store).await
    }

    #[tokio::test]
    async fn enqueue_survives_restart() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        queue.enqueue(create_entry(ResourceType::Piece, "local-p1")).await;
        queue.enqueue(create_entry(ResourceType::Element, "local-e1")).await;

        let restarted = queue_in(&dir).await;
        assert_eq!(restarted.len().await, 2);
        assert_eq!(restarted.snapshot().await, queue.snapshot().await);
    }

    #[tokio::test]
    async fn replay_order_is_insertion_order() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let first = create_entry(ResourceType::Piece, "local-p1");
        let second = update_entry(ResourceType::Piece, "local-p1", json!({"nom": "Salon"}));
        queue.enqueue(first.clone()).await;
        queue.enqueue(second.clone()).await;

        let drainable = queue.pending_and_failed().await;
        assert_eq!(drainable[0].id, first.id);
        assert_eq!(drainable[1].id, second.id);
    }

    #[tokio::test]
    async fn mark_failed_keeps_entry_at_its_position() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let first = create_entry(ResourceType::Piece, "local-p1");
        let second = create_entry(ResourceType::Element, "local-e1");
        queue.enqueue(first.clone()).await;
        queue.enqueue(second.clone()).await;

        queue.mark_failed(&first.id, "HTTP 503").await;

        let drainable = queue.pending_and_failed().await;
        assert_eq!(drainable.len(), 2);
        assert_eq!(drainable[0].id, first.id);
        assert_eq!(drainable[0].status, EntryStatus::Failed);
        assert_eq!(drainable[0].retry_count, 1);
        assert_eq!(drainable[0].last_error.as_deref(), Some("HTTP 503"));
    }

    #[tokio::test]
    async fn re_enqueueing_an_id_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let first = create_entry(ResourceType::Piece, "local-p1");
        let second = create_entry(ResourceType::Element, "local-e1");
        queue.enqueue(first.clone()).await;
        queue.enqueue(second).await;

        let mut replacement = first.clone();
        replacement.payload = json!({"id": "local-p1", "nom": "Chambre"});
        queue.enqueue(replacement).await;

        let snapshot = queue.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, first.id);
        assert_eq!(snapshot[0].payload["nom"], "Chambre");
    }

    #[tokio::test]
    async fn uploading_entries_are_not_drain_candidates() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let entry = create_entry(ResourceType::Piece, "local-p1");
        queue.enqueue(entry.clone()).await;
        queue.set_uploading(&entry.id).await;

        assert!(queue.pending_and_failed().await.is_empty());
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn uploading_status_is_never_persisted() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let entry = create_entry(ResourceType::Piece, "local-p1");
        queue.enqueue(entry.clone()).await;
        queue.set_uploading(&entry.id).await;
        queue.persist_now().await;

        let restarted = queue_in(&dir).await;
        let restored = restarted.get(&entry.id).await.unwrap();
        assert_eq!(restored.status, EntryStatus::Pending);
    }

    #[tokio::test]
    async fn resolve_placeholder_rewrites_later_entries() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let create_piece = create_entry(ResourceType::Piece, "local-p1");
        let add_element = update_entry(
            ResourceType::Element,
            "local-e1",
            json!({"pieceId": "local-p1", "nom": "Mur nord"}),
        );
        queue.enqueue(create_piece.clone()).await;
        queue.enqueue(add_element.clone()).await;
        queue.dequeue_on_success(&create_piece.id).await;

        let touched = queue.resolve_placeholder("local-p1", "srv-77").await;

        assert_eq!(touched, 1);
        let remaining = queue.get(&add_element.id).await.unwrap();
        assert_eq!(remaining.payload["pieceId"], "srv-77");
    }

    #[tokio::test]
    async fn dequeue_on_success_removes_from_disk_after_flush() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir).await;

        let entry = create_entry(ResourceType::Edl, "local-edl");
        queue.enqueue(entry.clone()).await;
        queue.dequeue_on_success(&entry.id).await;
        queue.persist_now().await;

        let restarted = queue_in(&dir).await;
        assert_eq!(restarted.len().await, 0);
    }
}
