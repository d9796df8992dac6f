use crate::application::ports::{ConnectivityEvent, ConnectivityProvider};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Watches the platform reachability signal and publishes edge-triggered
/// transitions onto the event channel the sync orchestrator consumes.
pub struct NetworkMonitor {
    provider: Arc<dyn ConnectivityProvider>,
    events: mpsc::Sender<ConnectivityEvent>,
}

impl NetworkMonitor {
    pub fn new(
        provider: Arc<dyn ConnectivityProvider>,
    ) -> (Self, mpsc::Receiver<ConnectivityEvent>) {
        let (events, receiver) = mpsc::channel(8);
        (Self { provider, events }, receiver)
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_connected()
    }

    pub fn spawn(&self) -> JoinHandle<()> {
        let mut signal = self.provider.subscribe();
        let events = self.events.clone();
        let mut was_connected = *signal.borrow();
        tokio::spawn(async move {
            while signal.changed().await.is_ok() {
                let connected = *signal.borrow_and_update();
                if connected == was_connected {
                    continue;
                }
                was_connected = connected;
                let event = if connected {
                    info!("network became reachable");
                    ConnectivityEvent::Online
                } else {
                    info!("network lost");
                    ConnectivityEvent::Offline
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
            debug!("connectivity signal closed, network monitor terminated");
        })
    }
}
