use crate::application::ports::{
    AccessTokenProvider, ConnectivityEvent, ConnectivityProvider, SyncNotification,
};
use crate::application::services::{MutationQueueService, PhotoQueueService, SyncOrchestrator};
use crate::domain::entities::{MutationEntry, PhotoMetadata, QueuedPhoto, SyncReport};
use crate::domain::value_objects::{EntryId, MutationOperation, PhotoKind, ResourceRef};
use crate::infrastructure::{BroadcastNotifier, DiskStager, HttpApiClient, JsonFileStore, NetworkMonitor};
use crate::shared::config::AppConfig;
use crate::shared::error::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::info;

/// Dependency-injection root: builds every component of the write engine
/// once at process start and hands the UI layer a single facade. The
/// collaborators the core does not own (reachability signal, token supplier)
/// are injected so the shell and the tests can provide their own.
pub struct AppState {
    pub config: AppConfig,
    mutations: Arc<MutationQueueService>,
    photos: Arc<PhotoQueueService>,
    orchestrator: Arc<SyncOrchestrator>,
    monitor: NetworkMonitor,
    notifier: Arc<BroadcastNotifier>,
    connectivity_events: Mutex<Option<mpsc::Receiver<ConnectivityEvent>>>,
}

impl AppState {
    pub async fn new(
        config: AppConfig,
        connectivity: Arc<dyn ConnectivityProvider>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let store = Arc::new(JsonFileStore::new(config.storage.data_dir.clone()));
        let stager = Arc::new(DiskStager::new(config.storage.staging_dir.clone()));
        let mutations = Arc::new(MutationQueueService::restore(store.clone()).await);
        let photos = Arc::new(PhotoQueueService::restore(store, stager).await);
        let api = Arc::new(HttpApiClient::new(&config.api, tokens)?);
        let notifier = Arc::new(BroadcastNotifier::default());
        let (monitor, connectivity_events) = NetworkMonitor::new(connectivity);
        let orchestrator = Arc::new(SyncOrchestrator::new(
            mutations.clone(),
            photos.clone(),
            api.clone(),
            api.clone(),
            api,
            notifier.clone(),
            config.sync.clone(),
        ));
        Ok(Self {
            config,
            mutations,
            photos,
            orchestrator,
            monitor,
            notifier,
            connectivity_events: Mutex::new(Some(connectivity_events)),
        })
    }

    /// Spawns the background loops: connectivity monitor, reconnect-triggered
    /// drain consumer, and the coalescing queue flush tasks. Idempotent in
    /// effect; the second call finds the event channel already taken.
    pub async fn start(&self) {
        if let Some(events) = self.connectivity_events.lock().await.take() {
            self.monitor.spawn();
            self.orchestrator.spawn(events);
            let flush = Duration::from_secs(self.config.sync.flush_interval_secs);
            self.mutations.spawn_flush(flush);
            self.photos.spawn_flush(flush);
            info!("offline write engine started");
        }
    }

    /// Fire-and-forget from the editing screens: records the write locally
    /// and returns at local-persistence speed, online or not.
    pub async fn enqueue_mutation(
        &self,
        operation: MutationOperation,
        payload: serde_json::Value,
    ) -> MutationEntry {
        let entry = MutationEntry::new(operation, payload);
        self.mutations.enqueue(entry.clone()).await;
        entry
    }

    /// Stages the captured file and queues the upload. A staging failure is
    /// returned immediately so the capture screen can tell the user now.
    pub async fn enqueue_photo(
        &self,
        source: &Path,
        target: ResourceRef,
        kind: PhotoKind,
        metadata: PhotoMetadata,
    ) -> Result<QueuedPhoto> {
        self.photos.enqueue(source, target, kind, metadata).await
    }

    /// User deletion of a queued photo: entry, staged file and ordinal
    /// compaction in one step.
    pub async fn delete_photo(&self, id: &EntryId) -> bool {
        self.photos.remove(id).await
    }

    pub async fn delete_mutation(&self, id: &EntryId) -> bool {
        self.mutations.remove(id).await
    }

    /// Manual re-drive of one failed entry, outside a full pass.
    pub async fn retry(&self, id: &EntryId) -> Result<bool> {
        self.orchestrator.retry_entry(id).await
    }

    /// User-initiated full drain ("sync now"), bypassing settle and probe.
    pub async fn sync_now(&self) -> Option<SyncReport> {
        self.orchestrator.sync_now().await
    }

    pub async fn mutation_queue_len(&self) -> usize {
        self.mutations.len().await
    }

    pub async fn photo_queue_len(&self) -> usize {
        self.photos.len().await
    }

    pub async fn queued_mutations(&self) -> Vec<MutationEntry> {
        self.mutations.snapshot().await
    }

    pub async fn queued_photos(&self) -> Vec<QueuedPhoto> {
        self.photos.snapshot().await
    }

    pub fn is_connected(&self) -> bool {
        self.monitor.is_connected()
    }

    /// Stream of engine notifications for badges, toasts and per-entry
    /// spinners.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<SyncNotification> {
        self.notifier.subscribe()
    }
}
