#![allow(unused_imports)]

pub mod config;
pub mod error;

pub use config::{ApiConfig, AppConfig, StorageConfig, SyncConfig};
pub use error::{AppError, Result};
