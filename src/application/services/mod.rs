pub mod mutation_queue;
pub mod photo_queue;
pub mod sync_orchestrator;

pub use mutation_queue::MutationQueueService;
pub use photo_queue::PhotoQueueService;
pub use sync_orchestrator::{DrainState, SyncOrchestrator};
