pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{
    AccessTokenProvider, ConnectivityEvent, ConnectivityProvider, QueueKind, ReplayOutcome,
    SyncNotification,
};
pub use application::services::{DrainState, SyncOrchestrator};
pub use domain::entities::{MutationEntry, PhotoMetadata, QueuedPhoto, SyncReport};
pub use domain::value_objects::{
    EntryId, EntryStatus, MutationKind, MutationOperation, PhotoKind, ResourceRef, ResourceType,
    UploadState,
};
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;

/// Install the tracing subscriber for the host application.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edl_offline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
