//! Receiving change notifications from a [`ChangeBus`](promptbook_core::sync::ChangeBus).

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;

use promptbook_core::sync::PromptsChanged;

/// Waits for the next change announcement.
///
/// A receiver that fell behind gets a sourceless event, which forces a
/// reload. Returns `None` once every sender is gone.
pub async fn next_change(receiver: &mut Receiver<PromptsChanged>) -> Option<PromptsChanged> {
    match receiver.recv().await {
        Ok(event) => Some(event),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!("[PromptStore] Missed {} change notifications", skipped);
            Some(PromptsChanged::external())
        }
        Err(RecvError::Closed) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbook_core::sync::{ChangeBus, ChangeNotifier, SourceId};

    #[tokio::test]
    async fn test_lagged_receiver_gets_external_event() {
        let bus = ChangeBus::with_capacity(1);
        let mut receiver = bus.subscribe();
        let source = SourceId::generate("main");
        bus.notify(PromptsChanged::from_source(source.clone()));
        bus.notify(PromptsChanged::from_source(source.clone()));

        let event = next_change(&mut receiver).await.unwrap();
        assert!(event.source.is_none());
        assert!(next_change(&mut receiver).await.unwrap().is_from(&source));
    }

    #[tokio::test]
    async fn test_closed_bus_ends_stream() {
        let bus = ChangeBus::new();
        let mut receiver = bus.subscribe();
        drop(bus);
        assert!(next_change(&mut receiver).await.is_none());
    }
}
