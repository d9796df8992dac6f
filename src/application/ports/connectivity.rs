use async_trait::async_trait;
use tokio::sync::watch;

/// Device reachability signal provided by the host platform.
pub trait ConnectivityProvider: Send + Sync {
    fn is_connected(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Edge-triggered connectivity transitions published by the network monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Lightweight check that the API is actually reachable, run after the
/// settling delay. Advisory only: a failed probe delays the drain pass, it
/// never cancels it.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn check(&self) -> bool;
}
