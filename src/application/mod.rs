pub mod ports;
pub mod services;

pub use services::{MutationQueueService, PhotoQueueService, SyncOrchestrator};
