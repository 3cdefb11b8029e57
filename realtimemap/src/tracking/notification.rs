//! Singleton actor handing geofence notifications to the delivery bridge.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actors::{ActorContext, ActorType, DurableActor};
use crate::bridge::NotificationBridge;
use crate::error::ActorError;
use crate::model::Notification;

/// Signals accepted by [`NotificationActor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationSignal {
    /// Deliver one notification.
    Notify(Notification),
}

/// Forwards notifications as JSON. A failed publish loses the notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationActor {
    published: u64,
}

#[async_trait::async_trait]
impl DurableActor for NotificationActor {
    type Signal = NotificationSignal;
    /// Notifications published so far.
    type Query = u64;
    type Deps = Arc<dyn NotificationBridge>;

    fn actor_type() -> ActorType {
        ActorType::Notification
    }

    async fn on_signal(
        &mut self,
        signal: NotificationSignal,
        ctx: &mut ActorContext<'_, Self::Deps>,
    ) -> Result<(), ActorError> {
        match signal {
            NotificationSignal::Notify(notification) => {
                let payload = serde_json::to_string(&notification)?;
                ctx.deps().publish(payload).await?;
                self.published += 1;
                Ok(())
            }
        }
    }

    fn query(&self) -> u64 {
        self.published
    }
}
