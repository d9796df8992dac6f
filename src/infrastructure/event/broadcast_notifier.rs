use crate::application::ports::{SyncNotification, SyncNotifier};
use tokio::sync::broadcast;

/// Fans sync notifications out to however many UI surfaces are listening
/// (badges, toasts, inline spinners). Nobody listening is fine: the engine
/// never blocks on its observers.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<SyncNotification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncNotification> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SyncNotifier for BroadcastNotifier {
    fn notify(&self, notification: SyncNotification) {
        let _ = self.sender.send(notification);
    }
}
