pub mod access_token;
pub mod connectivity;
pub mod entry_store;
pub mod notifier;
pub mod photo_stager;
pub mod replay_client;

pub use access_token::AccessTokenProvider;
pub use connectivity::{ConnectivityEvent, ConnectivityProvider, ReachabilityProbe};
pub use entry_store::{EntryStore, MUTATION_QUEUE_KEY, PHOTO_QUEUE_KEY};
pub use notifier::{QueueKind, SyncNotification, SyncNotifier};
pub use photo_stager::PhotoStager;
pub use replay_client::{MutationReplayClient, PhotoUploadClient, ProgressHook, ReplayOutcome};
