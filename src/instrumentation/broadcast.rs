//! In-process publish/subscribe instrumentation.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use super::{Instrumentation, Notification, NotificationPayload};
use crate::clients::TransactionId;

/// Instrumentation that fans notifications out to subscribers.
///
/// Built on a `tokio` broadcast channel: each subscriber receives every
/// notification published after it subscribed. Subscribers that fall more
/// than `capacity` notifications behind miss the oldest ones. Publishing
/// with no subscribers is not an error.
///
/// # Example
///
/// ```rust
/// use companies_house::instrumentation::BroadcastInstrumentation;
///
/// let instrumentation = BroadcastInstrumentation::new(32);
/// let receiver = instrumentation.subscribe();
/// assert_eq!(instrumentation.subscriber_count(), 1);
/// # drop(receiver);
/// ```
#[derive(Debug, Clone)]
pub struct BroadcastInstrumentation {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastInstrumentation {
    /// Default number of buffered notifications per subscriber.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates a channel buffering up to `capacity` notifications.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to notifications published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastInstrumentation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Instrumentation for BroadcastInstrumentation {
    fn publish(
        &self,
        name: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        transaction_id: &TransactionId,
        payload: &NotificationPayload,
    ) {
        let notification = Notification {
            name: name.to_string(),
            started_at,
            ended_at,
            transaction_id: transaction_id.clone(),
            payload: payload.clone(),
        };

        if self.sender.send(notification).is_err() {
            tracing::trace!(event = name, "No subscribers for notification");
        }
    }
}
