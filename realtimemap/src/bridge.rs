//! Notification delivery bridge.
//!
//! The notification actor hands serialized notifications to a
//! [`NotificationBridge`]; live clients subscribe on the other side. The
//! bundled [`BroadcastBridge`] is an in-process tokio broadcast channel.

use std::fmt;

use tokio::sync::broadcast;
use tracing::trace;

use crate::error::BridgeError;

/// Outbound channel for serialized notifications.
#[async_trait::async_trait]
pub trait NotificationBridge: fmt::Debug + Send + Sync {
    /// Publish one JSON payload to every current subscriber.
    ///
    /// Having no subscribers is not an error.
    async fn publish(&self, payload: String) -> Result<(), BridgeError>;
}

/// In-process publish/subscribe bridge.
///
/// Subscribers that fall more than `capacity` messages behind lose the
/// oldest messages.
#[derive(Debug, Clone)]
pub struct BroadcastBridge {
    sender: broadcast::Sender<String>,
}

impl BroadcastBridge {
    /// Create a bridge buffering up to `capacity` messages per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all messages published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait::async_trait]
impl NotificationBridge for BroadcastBridge {
    async fn publish(&self, payload: String) -> Result<(), BridgeError> {
        match self.sender.send(payload) {
            Ok(receivers) => trace!(receivers, "notification published"),
            Err(_) => trace!("notification published without subscribers"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bridge = BroadcastBridge::new(8);
        assert_eq!(bridge.subscriber_count(), 0);
        bridge
            .publish("{}".to_string())
            .await
            .expect("publishing to nobody succeeds");
    }

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let bridge = BroadcastBridge::new(8);
        let mut first = bridge.subscribe();
        let mut second = bridge.subscribe();
        assert_eq!(bridge.subscriber_count(), 2);

        bridge.publish("hello".to_string()).await.expect("publish");

        assert_eq!(first.recv().await.expect("first"), "hello");
        assert_eq!(second.recv().await.expect("second"), "hello");
    }
}
