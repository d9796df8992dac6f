pub mod api_client;
pub mod monitor;

pub use api_client::HttpApiClient;
pub use monitor::NetworkMonitor;
