pub mod entry_id;
pub mod entry_status;
pub mod mutation;
pub mod photo_kind;
pub mod resource_ref;
pub mod upload_state;

pub use entry_id::EntryId;
pub use entry_status::EntryStatus;
pub use mutation::{MutationKind, MutationOperation, ResourceType};
pub use photo_kind::PhotoKind;
pub use resource_ref::ResourceRef;
pub use upload_state::UploadState;
