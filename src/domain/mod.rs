#![allow(unused_imports)]

pub mod entities;
pub mod value_objects;

pub use entities::{MutationEntry, PhotoMetadata, QueuedPhoto, SyncReport};
pub use value_objects::{
    EntryId, EntryStatus, MutationKind, MutationOperation, PhotoKind, ResourceRef, ResourceType,
    UploadState,
};
