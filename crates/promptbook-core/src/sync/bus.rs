//! In-process fan-out of change notifications.

use tokio::sync::broadcast;

use super::event::PromptsChanged;

/// Anything that can tell other live instances the collection changed.
pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, event: PromptsChanged);
}

/// Notifier that drops every event. Used by single-window setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify(&self, _event: PromptsChanged) {}
}

/// Broadcast channel shared by every store in the process.
///
/// Subscribers that fall behind lose the oldest events; a lagging store
/// only needs to know that *something* changed, so that is harmless.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<PromptsChanged>,
}

impl ChangeBus {
    const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Registers a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<PromptsChanged> {
        self.sender.subscribe()
    }

    /// Number of live listeners.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for ChangeBus {
    fn notify(&self, event: PromptsChanged) {
        // No listeners is not an error.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SourceId;

    #[tokio::test]
    async fn test_bus_delivers_to_all_subscribers() {
        let bus = ChangeBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        let source = SourceId::generate("main");
        bus.notify(PromptsChanged::from_source(source.clone()));

        assert!(first.recv().await.unwrap().is_from(&source));
        assert!(second.recv().await.unwrap().is_from(&source));
    }

    #[test]
    fn test_notify_without_subscribers() {
        let bus = ChangeBus::new();
        bus.notify(PromptsChanged::external());
    }
}
