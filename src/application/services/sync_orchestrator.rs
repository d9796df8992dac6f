use crate::application::ports::{
    ConnectivityEvent, MutationReplayClient, PhotoUploadClient, QueueKind, ReachabilityProbe,
    ReplayOutcome, SyncNotification, SyncNotifier,
};
use crate::application::services::{MutationQueueService, PhotoQueueService};
use crate::domain::entities::SyncReport;
use crate::domain::value_objects::{EntryId, MutationKind, UploadState};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Idle,
    Probing,
    DrainingMutations,
    DrainingPhotos,
}

/// Reacts to the offline→online transition and drains both queues, one entry
/// at a time, mutations strictly before photos. A single logical worker: the
/// next entry is only attempted once the previous one (and its
/// server-assigned ids) has been observed.
pub struct SyncOrchestrator {
    mutations: Arc<MutationQueueService>,
    photos: Arc<PhotoQueueService>,
    mutation_client: Arc<dyn MutationReplayClient>,
    photo_client: Arc<dyn PhotoUploadClient>,
    probe: Arc<dyn ReachabilityProbe>,
    notifier: Arc<dyn SyncNotifier>,
    config: SyncConfig,
    state: RwLock<DrainState>,
}

impl SyncOrchestrator {
    pub fn new(
        mutations: Arc<MutationQueueService>,
        photos: Arc<PhotoQueueService>,
        mutation_client: Arc<dyn MutationReplayClient>,
        photo_client: Arc<dyn PhotoUploadClient>,
        probe: Arc<dyn ReachabilityProbe>,
        notifier: Arc<dyn SyncNotifier>,
        config: SyncConfig,
    ) -> Self {
        Self {
            mutations,
            photos,
            mutation_client,
            photo_client,
            probe,
            notifier,
            config,
            state: RwLock::new(DrainState::Idle),
        }
    }

    pub async fn state(&self) -> DrainState {
        *self.state.read().await
    }

    /// Consumer loop over the connectivity event channel. A reconnect event
    /// arriving while a pass is already running is dropped by the guard in
    /// `reconnect_pass`; there are no re-entrant passes.
    pub fn spawn(self: &Arc<Self>, mut events: mpsc::Receiver<ConnectivityEvent>) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event != ConnectivityEvent::Online {
                    continue;
                }
                orchestrator.reconnect_pass().await;
            }
            debug!("connectivity event channel closed, sync loop terminated");
        })
    }

    /// Full reconnect-triggered pass: settle, probe, drain. The settle delay
    /// keeps flaky reconnects from triggering back-to-back passes; the probe
    /// is advisory, a failure only buys the network a little more time.
    pub async fn reconnect_pass(&self) -> Option<SyncReport> {
        if !self.begin().await {
            debug!("drain pass already running, reconnect event ignored");
            return None;
        }
        tokio::time::sleep(Duration::from_secs(self.config.settle_delay_secs)).await;
        if !self.probe.check().await {
            warn!("reachability probe failed, draining anyway after grace period");
            tokio::time::sleep(Duration::from_secs(self.config.degraded_probe_delay_secs)).await;
        }
        Some(self.drain().await)
    }

    /// User-initiated pass ("sync now"): same drain, no settling or probe.
    pub async fn sync_now(&self) -> Option<SyncReport> {
        if !self.begin().await {
            return None;
        }
        Some(self.drain().await)
    }

    /// Manual re-drive of one failed entry outside a full pass. Refused while
    /// a pass is running: the pass will pick the entry up anyway.
    pub async fn retry_entry(&self, id: &EntryId) -> Result<bool, AppError> {
        if !self.begin().await {
            return Ok(false);
        }
        let result = self.retry_entry_inner(id).await;
        *self.state.write().await = DrainState::Idle;
        result.map(|_| true)
    }

    async fn retry_entry_inner(&self, id: &EntryId) -> Result<(), AppError> {
        if self.mutations.get(id).await.is_some() {
            let mut report = SyncReport::default();
            self.attempt_mutation(id, &mut report).await;
            self.mutations.persist_now().await;
            return Ok(());
        }
        if self.photos.get(id).await.is_some() {
            let mut report = SyncReport::default();
            self.attempt_photo(id, &mut report).await;
            self.photos.persist_now().await;
            return Ok(());
        }
        Err(AppError::NotFound(format!("no queued entry with id {id}")))
    }

    /// Non-blocking "already draining" guard: Idle → Probing, or bail.
    async fn begin(&self) -> bool {
        let mut state = self.state.write().await;
        if *state != DrainState::Idle {
            return false;
        }
        *state = DrainState::Probing;
        true
    }

    async fn drain(&self) -> SyncReport {
        let mut report = SyncReport::default();

        *self.state.write().await = DrainState::DrainingMutations;
        let mutation_ids: Vec<EntryId> = self
            .mutations
            .pending_and_failed()
            .await
            .into_iter()
            .map(|e| e.id)
            .collect();
        for id in &mutation_ids {
            self.attempt_mutation(id, &mut report).await;
        }

        *self.state.write().await = DrainState::DrainingPhotos;
        let photo_ids: Vec<EntryId> = self
            .photos
            .pending_and_failed()
            .await
            .into_iter()
            .map(|p| p.id)
            .collect();
        for id in &photo_ids {
            self.attempt_photo(id, &mut report).await;
        }

        // One durable write per pass instead of one per status change.
        self.mutations.persist_now().await;
        self.photos.persist_now().await;
        *self.state.write().await = DrainState::Idle;

        if !report.is_empty() {
            info!(
                mutations = report.mutations_synced,
                photos = report.photos_synced,
                failed = report.mutations_failed + report.photos_failed,
                "drain pass completed"
            );
            self.notifier.notify(SyncNotification::PassCompleted {
                message: report.summary(),
                report: report.clone(),
            });
        }
        report
    }

    /// One awaited attempt for one mutation entry. Entries are re-read from
    /// the queue at attempt time: an earlier create in the same pass may have
    /// rewritten this entry's placeholder references.
    async fn attempt_mutation(&self, id: &EntryId, report: &mut SyncReport) {
        let Some(entry) = self.mutations.get(id).await else {
            return;
        };
        report.mutations_attempted += 1;
        self.mutations.set_uploading(id).await;
        self.entry_state(id, UploadState::Uploading);

        match self.mutation_client.replay(&entry).await {
            ReplayOutcome::Success { assigned_id } => {
                self.mutations.dequeue_on_success(id).await;
                report.mutations_synced += 1;
                self.entry_state(id, UploadState::Uploaded);

                // Later queued entries (and queued photos) may reference the
                // placeholder of this create; rewrite them before they are
                // attempted.
                if entry.operation.kind == MutationKind::Create && entry.operation.target.is_local()
                {
                    if let Some(server_id) = assigned_id {
                        let local_id = entry.operation.target.id().to_string();
                        let rewritten = self.mutations.resolve_placeholder(&local_id, &server_id).await
                            + self.photos.resolve_placeholder(&local_id, &server_id).await;
                        if rewritten > 0 {
                            debug!(
                                "substituted {local_id} -> {server_id} in {rewritten} queued entr(ies)"
                            );
                        }
                    }
                }
            }
            ReplayOutcome::Retryable(reason) => {
                self.mutations.mark_failed(id, &reason).await;
                report.mutations_failed += 1;
                self.entry_state(id, UploadState::Failed);
                debug!("mutation {id} failed transiently: {reason}");
            }
            ReplayOutcome::Fatal(reason) => {
                self.mutations.mark_failed(id, &reason).await;
                report.mutations_failed += 1;
                self.entry_state(id, UploadState::Failed);
                error!("mutation {id} rejected by the server: {reason}");
                self.notifier.notify(SyncNotification::NeedsAttention {
                    id: id.clone(),
                    queue: QueueKind::Mutations,
                    reason,
                });
            }
            ReplayOutcome::AuthExpired => {
                self.mutations.mark_failed(id, "session expirée").await;
                report.mutations_failed += 1;
                self.entry_state(id, UploadState::Failed);
                self.notifier.notify(SyncNotification::SessionExpired);
            }
        }
    }

    async fn attempt_photo(&self, id: &EntryId, report: &mut SyncReport) {
        let Some(photo) = self.photos.get(id).await else {
            return;
        };
        report.photos_attempted += 1;

        // The target create never succeeded in this pass; uploading against
        // the placeholder can only 4xx. Keep the photo for the next pass.
        if photo.target.is_local() {
            self.photos
                .mark_failed(id, "target resource not yet created on the server")
                .await;
            report.photos_failed += 1;
            self.entry_state(id, UploadState::Failed);
            return;
        }

        self.photos.set_uploading(id).await;
        self.entry_state(id, UploadState::Uploading);

        match self.photo_client.upload(&photo, None).await {
            ReplayOutcome::Success { .. } => {
                self.photos.dequeue_on_success(id).await;
                report.photos_synced += 1;
                self.entry_state(id, UploadState::Uploaded);
            }
            ReplayOutcome::Retryable(reason) => {
                self.photos.mark_failed(id, &reason).await;
                report.photos_failed += 1;
                self.entry_state(id, UploadState::Failed);
                debug!("photo {id} failed transiently: {reason}");
            }
            ReplayOutcome::Fatal(reason) => {
                self.photos.mark_failed(id, &reason).await;
                report.photos_failed += 1;
                self.entry_state(id, UploadState::Failed);
                error!("photo {id} rejected by the server: {reason}");
                self.notifier.notify(SyncNotification::NeedsAttention {
                    id: id.clone(),
                    queue: QueueKind::Photos,
                    reason,
                });
            }
            ReplayOutcome::AuthExpired => {
                self.photos.mark_failed(id, "session expirée").await;
                report.photos_failed += 1;
                self.entry_state(id, UploadState::Failed);
                self.notifier.notify(SyncNotification::SessionExpired);
            }
        }
    }

    fn entry_state(&self, id: &EntryId, state: UploadState) {
        self.notifier.notify(SyncNotification::EntryState {
            id: id.clone(),
            state,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MutationEntry, PhotoMetadata, QueuedPhoto};
    use crate::domain::value_objects::{
        EntryStatus, MutationOperation, PhotoKind, ResourceRef, ResourceType,
    };
    use crate::infrastructure::storage::{DiskStager, JsonFileStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::fs;

    #[derive(Default)]
    struct FakeMutationClient {
        outcomes: Mutex<HashMap<EntryId, ReplayOutcome>>,
        replayed: Mutex<Vec<MutationEntry>>,
    }

    impl FakeMutationClient {
        fn script(&self, id: &EntryId, outcome: ReplayOutcome) {
            self.outcomes.lock().unwrap().insert(id.clone(), outcome);
        }

        fn replayed(&self) -> Vec<MutationEntry> {
            self.replayed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MutationReplayClient for FakeMutationClient {
        async fn replay(&self, entry: &MutationEntry) -> ReplayOutcome {
            self.replayed.lock().unwrap().push(entry.clone());
            self.outcomes
                .lock()
                .unwrap()
                .get(&entry.id)
                .cloned()
                .unwrap_or(ReplayOutcome::Success { assigned_id: None })
        }
    }

    #[derive(Default)]
    struct FakePhotoClient {
        outcomes: Mutex<HashMap<EntryId, ReplayOutcome>>,
        uploaded: Mutex<Vec<QueuedPhoto>>,
        delay: Option<Duration>,
    }

    impl FakePhotoClient {
        fn script(&self, id: &EntryId, outcome: ReplayOutcome) {
            self.outcomes.lock().unwrap().insert(id.clone(), outcome);
        }

        fn uploaded(&self) -> Vec<QueuedPhoto> {
            self.uploaded.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PhotoUploadClient for FakePhotoClient {
        async fn upload(
            &self,
            photo: &QueuedPhoto,
            _progress: Option<crate::application::ports::ProgressHook>,
        ) -> ReplayOutcome {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.uploaded.lock().unwrap().push(photo.clone());
            self.outcomes
                .lock()
                .unwrap()
                .get(&photo.id)
                .cloned()
                .unwrap_or(ReplayOutcome::Success { assigned_id: None })
        }
    }

    struct FakeProbe {
        ok: bool,
    }

    #[async_trait]
    impl ReachabilityProbe for FakeProbe {
        async fn check(&self) -> bool {
            self.ok
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<SyncNotification>>,
    }

    impl RecordingNotifier {
        fn events(&self) -> Vec<SyncNotification> {
            self.events.lock().unwrap().clone()
        }

        fn pass_completed_count(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, SyncNotification::PassCompleted { .. }))
                .count()
        }
    }

    impl SyncNotifier for RecordingNotifier {
        fn notify(&self, notification: SyncNotification) {
            self.events.lock().unwrap().push(notification);
        }
    }

    struct Harness {
        _data: TempDir,
        _staging: TempDir,
        source_dir: TempDir,
        store: Arc<JsonFileStore>,
        stager: Arc<DiskStager>,
        mutations: Arc<MutationQueueService>,
        photos: Arc<PhotoQueueService>,
        mutation_client: Arc<FakeMutationClient>,
        photo_client: Arc<FakePhotoClient>,
        notifier: Arc<RecordingNotifier>,
        orchestrator: SyncOrchestrator,
    }

    impl Harness {
        async fn new() -> Self {
            Self::with_photo_client(FakePhotoClient::default()).await
        }

        async fn with_photo_client(photo_client: FakePhotoClient) -> Self {
            let data = TempDir::new().unwrap();
            let staging = TempDir::new().unwrap();
            let store = Arc::new(JsonFileStore::new(data.path().to_path_buf()));
            let stager = Arc::new(DiskStager::new(staging.path().to_path_buf()));
            let mutations = Arc::new(MutationQueueService::restore(store.clone()).await);
            let photos =
                Arc::new(PhotoQueueService::restore(store.clone(), stager.clone()).await);
            let mutation_client = Arc::new(FakeMutationClient::default());
            let photo_client = Arc::new(photo_client);
            let notifier = Arc::new(RecordingNotifier::default());
            let config = SyncConfig {
                settle_delay_secs: 0,
                degraded_probe_delay_secs: 0,
                flush_interval_secs: 1,
            };
            let orchestrator = SyncOrchestrator::new(
                mutations.clone(),
                photos.clone(),
                mutation_client.clone(),
                photo_client.clone(),
                Arc::new(FakeProbe { ok: true }),
                notifier.clone(),
                config,
            );
            Self {
                _data: data,
                _staging: staging,
                source_dir: TempDir::new().unwrap(),
                store,
                stager,
                mutations,
                photos,
                mutation_client,
                photo_client,
                notifier,
                orchestrator,
            }
        }

        async fn capture(&self, name: &str) -> PathBuf {
            let path = self.source_dir.path().join(name);
            fs::write(&path, b"jpeg-bytes").await.unwrap();
            path
        }

        async fn enqueue_photo(&self, target: ResourceRef, name: &str) -> QueuedPhoto {
            let source = self.capture(name).await;
            self.photos
                .enqueue(&source, target, PhotoKind::Element, PhotoMetadata::default())
                .await
                .unwrap()
        }
    }

    fn create_mutation(resource: ResourceType, placeholder: &str, payload: serde_json::Value) -> MutationEntry {
        MutationEntry::new(
            MutationOperation::create(resource, placeholder.to_string()),
            payload,
        )
    }

    #[tokio::test]
    async fn three_offline_photos_drain_with_one_aggregate_notification() {
        let h = Harness::new().await;
        let target = ResourceRef::Server("elem-1".into());
        let photos = vec![
            h.enqueue_photo(target.clone(), "a.jpg").await,
            h.enqueue_photo(target.clone(), "b.jpg").await,
            h.enqueue_photo(target.clone(), "c.jpg").await,
        ];

        let report = h.orchestrator.reconnect_pass().await.unwrap();

        assert_eq!(report.photos_synced, 3);
        assert_eq!(h.photos.len().await, 0);
        for photo in &photos {
            assert!(!photo.staged_path.exists());
        }
        assert_eq!(h.notifier.pass_completed_count(), 1);
        let message = h.notifier.events().iter().find_map(|e| match e {
            SyncNotification::PassCompleted { message, .. } => Some(message.clone()),
            _ => None,
        });
        assert_eq!(
            message.as_deref(),
            Some("0 modification(s), 3 photo(s) synchronisée(s)")
        );

        // The emptied queue is durable.
        let restarted = PhotoQueueService::restore(h.store.clone(), h.stager.clone()).await;
        assert_eq!(restarted.len().await, 0);
    }

    #[tokio::test]
    async fn empty_pass_is_a_silent_noop() {
        let h = Harness::new().await;

        let report = h.orchestrator.reconnect_pass().await.unwrap();

        assert!(report.is_empty());
        assert!(h.notifier.events().is_empty());
        assert_eq!(h.orchestrator.state().await, DrainState::Idle);
    }

    #[tokio::test]
    async fn probe_failure_delays_but_does_not_cancel_the_drain() {
        let h = Harness::new().await;
        let orchestrator = SyncOrchestrator::new(
            h.mutations.clone(),
            h.photos.clone(),
            h.mutation_client.clone(),
            h.photo_client.clone(),
            Arc::new(FakeProbe { ok: false }),
            h.notifier.clone(),
            SyncConfig {
                settle_delay_secs: 0,
                degraded_probe_delay_secs: 0,
                flush_interval_secs: 1,
            },
        );
        let entry = create_mutation(ResourceType::Piece, "local-p1", json!({}));
        h.mutations.enqueue(entry).await;

        let report = orchestrator.reconnect_pass().await.unwrap();

        assert_eq!(report.mutations_synced, 1);
    }

    #[tokio::test]
    async fn server_422_keeps_entry_flagged_for_attention() {
        let h = Harness::new().await;
        let entry = create_mutation(ResourceType::Piece, "local-p1", json!({"nom": "Salon"}));
        h.mutation_client
            .script(&entry.id, ReplayOutcome::Fatal("HTTP 422".into()));
        h.mutations.enqueue(entry.clone()).await;

        h.orchestrator.reconnect_pass().await.unwrap();

        let kept = h.mutations.get(&entry.id).await.unwrap();
        assert_eq!(kept.status, EntryStatus::Failed);
        assert_eq!(kept.retry_count, 1);
        assert!(h.notifier.events().iter().any(|e| matches!(
            e,
            SyncNotification::NeedsAttention { queue: QueueKind::Mutations, .. }
        )));

        // A second automatic pass fails identically and still does not drop it.
        h.orchestrator.reconnect_pass().await.unwrap();
        let kept = h.mutations.get(&entry.id).await.unwrap();
        assert_eq!(kept.retry_count, 2);
    }

    #[tokio::test]
    async fn retryable_failure_does_not_block_the_rest_of_the_queue() {
        let h = Harness::new().await;
        let stuck = create_mutation(ResourceType::Piece, "local-p1", json!({}));
        let fine = create_mutation(ResourceType::Piece, "local-p2", json!({}));
        h.mutation_client
            .script(&stuck.id, ReplayOutcome::Retryable("HTTP 503".into()));
        h.mutations.enqueue(stuck.clone()).await;
        h.mutations.enqueue(fine.clone()).await;

        let report = h.orchestrator.reconnect_pass().await.unwrap();

        assert_eq!(report.mutations_attempted, 2);
        assert_eq!(report.mutations_synced, 1);
        assert_eq!(report.mutations_failed, 1);
        assert!(h.mutations.get(&stuck.id).await.is_some());
        assert!(h.mutations.get(&fine.id).await.is_none());
    }

    #[tokio::test]
    async fn create_then_dependent_entries_get_the_server_id() {
        let h = Harness::new().await;
        // Create a piece offline, then an element inside it, then a photo of
        // that element. Everything downstream references placeholders.
        let create_piece = create_mutation(ResourceType::Piece, "local-p1", json!({"nom": "Salon"}));
        let create_element = create_mutation(
            ResourceType::Element,
            "local-e1",
            json!({"pieceId": "local-p1", "nom": "Mur nord"}),
        );
        h.mutation_client.script(
            &create_piece.id,
            ReplayOutcome::Success { assigned_id: Some("srv-p-10".into()) },
        );
        h.mutation_client.script(
            &create_element.id,
            ReplayOutcome::Success { assigned_id: Some("srv-e-20".into()) },
        );
        h.mutations.enqueue(create_piece).await;
        h.mutations.enqueue(create_element).await;
        let photo = h
            .enqueue_photo(ResourceRef::Local("local-e1".into()), "mur.jpg")
            .await;

        let report = h.orchestrator.reconnect_pass().await.unwrap();

        assert_eq!(report.mutations_synced, 2);
        assert_eq!(report.photos_synced, 1);

        // The element create was replayed with the piece's server id.
        let replayed = h.mutation_client.replayed();
        assert_eq!(replayed[1].payload["pieceId"], "srv-p-10");
        // Its own placeholder is only resolved once the server answers.
        assert_eq!(replayed[1].operation.target, ResourceRef::Local("local-e1".into()));

        // The photo was uploaded against the element's server id.
        let uploaded = h.photo_client.uploaded();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].id, photo.id);
        assert_eq!(uploaded[0].target, ResourceRef::Server("srv-e-20".into()));
    }

    #[tokio::test]
    async fn photo_with_unresolved_target_waits_for_the_next_pass() {
        let h = Harness::new().await;
        let create_element = create_mutation(ResourceType::Element, "local-e9", json!({}));
        h.mutation_client
            .script(&create_element.id, ReplayOutcome::Retryable("timeout".into()));
        h.mutations.enqueue(create_element).await;
        let photo = h
            .enqueue_photo(ResourceRef::Local("local-e9".into()), "sol.jpg")
            .await;

        h.orchestrator.reconnect_pass().await.unwrap();

        // Never attempted against the API, still queued, file still staged.
        assert!(h.photo_client.uploaded().is_empty());
        let kept = h.photos.get(&photo.id).await.unwrap();
        assert_eq!(kept.status, EntryStatus::Failed);
        assert!(kept.staged_path.exists());
    }

    #[tokio::test]
    async fn auth_expiry_keeps_the_entry_and_signals_the_shell() {
        let h = Harness::new().await;
        let entry = create_mutation(ResourceType::Edl, "local-edl", json!({}));
        h.mutation_client.script(&entry.id, ReplayOutcome::AuthExpired);
        h.mutations.enqueue(entry.clone()).await;

        h.orchestrator.reconnect_pass().await.unwrap();

        assert!(h.mutations.get(&entry.id).await.is_some());
        assert!(h
            .notifier
            .events()
            .iter()
            .any(|e| matches!(e, SyncNotification::SessionExpired)));
    }

    #[tokio::test]
    async fn concurrent_pass_is_refused_by_the_guard() {
        let mut photo_client = FakePhotoClient::default();
        photo_client.delay = Some(Duration::from_millis(200));
        let h = Arc::new(Harness::with_photo_client(photo_client).await);
        h.enqueue_photo(ResourceRef::Server("elem-1".into()), "a.jpg").await;

        let slow = {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.orchestrator.sync_now().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(h.orchestrator.sync_now().await.is_none());
        let report = slow.await.unwrap().unwrap();
        assert_eq!(report.photos_synced, 1);
        assert_eq!(h.notifier.pass_completed_count(), 1);
    }

    #[tokio::test]
    async fn manual_retry_redrives_a_single_entry() {
        let h = Harness::new().await;
        let photo = h
            .enqueue_photo(ResourceRef::Server("elem-1".into()), "tache.jpg")
            .await;
        h.photos.mark_failed(&photo.id, "HTTP 500").await;

        assert!(h.orchestrator.retry_entry(&photo.id).await.unwrap());

        assert!(h.photos.get(&photo.id).await.is_none());
        assert!(!photo.staged_path.exists());
        // Single-entry retries never emit the aggregate pass toast.
        assert_eq!(h.notifier.pass_completed_count(), 0);
    }

    #[tokio::test]
    async fn manual_retry_of_unknown_entry_reports_not_found() {
        let h = Harness::new().await;

        let result = h.orchestrator.retry_entry(&EntryId::generate()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
