use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the serialized queue files.
    pub data_dir: PathBuf,
    /// Directory holding staged photo copies awaiting upload.
    pub staging_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Delay between the reconnect event and the start of a drain pass,
    /// so flaky reconnects do not trigger back-to-back passes.
    pub settle_delay_secs: u64,
    /// Extra wait applied when the reachability probe fails. The drain is
    /// still attempted afterwards; the probe is advisory, not a gate.
    pub degraded_probe_delay_secs: u64,
    /// Coalescing window for background queue persistence.
    pub flush_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join("edl-mobile");
        Self {
            api: ApiConfig {
                base_url: "https://api.edl-mobile.fr".to_string(),
                request_timeout_secs: 30,
            },
            storage: StorageConfig {
                data_dir: base_dir.join("queues"),
                staging_dir: base_dir.join("staging"),
            },
            sync: SyncConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: 3,
            degraded_probe_delay_secs: 5,
            flush_interval_secs: 2,
        }
    }
}
