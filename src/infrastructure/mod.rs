pub mod event;
pub mod network;
pub mod storage;

pub use event::BroadcastNotifier;
pub use network::{HttpApiClient, NetworkMonitor};
pub use storage::{DiskStager, JsonFileStore};
