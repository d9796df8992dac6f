pub mod mutation_entry;
pub mod queued_photo;
pub mod sync_report;

pub use mutation_entry::MutationEntry;
pub use queued_photo::{PhotoMetadata, QueuedPhoto};
pub use sync_report::SyncReport;
