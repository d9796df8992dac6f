pub mod json_store;
pub mod staging;

pub use json_store::JsonFileStore;
pub use staging::DiskStager;
