//! Broadcast subscribers and the concurrent fan-out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use gwt_types::{BroadcastMessage, DeliveryError};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A module that wants to hear every conscious broadcast.
#[async_trait]
pub trait Subscriber: Send + Sync {
    fn name(&self) -> &str;

    async fn receive(&self, message: &BroadcastMessage) -> Result<(), DeliveryError>;
}

/// Result of delivering one broadcast to one subscriber.
#[derive(Clone, Debug, Serialize)]
pub struct DeliveryReport {
    pub subscriber: String,
    pub result: Result<(), DeliveryError>,
}

impl DeliveryReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Forwards broadcasts into a bounded channel.
pub struct ChannelSubscriber {
    name: String,
    sender: mpsc::Sender<BroadcastMessage>,
}

impl ChannelSubscriber {
    pub fn new(name: impl Into<String>, buffer: usize) -> (Self, mpsc::Receiver<BroadcastMessage>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (
            Self {
                name: name.into(),
                sender,
            },
            receiver,
        )
    }
}

#[async_trait]
impl Subscriber for ChannelSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    async fn receive(&self, message: &BroadcastMessage) -> Result<(), DeliveryError> {
        self.sender
            .send(message.clone())
            .await
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

/// Deliver `message` to every subscriber concurrently.
///
/// Each delivery runs in its own task, so an error, timeout, or panic in one
/// subscriber is captured in its report without affecting the others. All
/// deliveries are awaited before returning; reports follow `subscribers`
/// order.
///
/// # Panics
///
/// Spawns one task per subscriber with `tokio::spawn`, so it panics when
/// called outside a Tokio runtime with a non-empty `subscribers` slice.
pub async fn fan_out(
    subscribers: &[Arc<dyn Subscriber>],
    message: Arc<BroadcastMessage>,
    timeout: Option<Duration>,
) -> Vec<DeliveryReport> {
    let handles: Vec<_> = subscribers
        .iter()
        .map(|subscriber| {
            let subscriber = Arc::clone(subscriber);
            let message = Arc::clone(&message);
            tokio::spawn(async move {
                let delivery = subscriber.receive(&message);
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, delivery)
                        .await
                        .unwrap_or(Err(DeliveryError::TimedOut {
                            timeout_ms: limit.as_millis() as u64,
                        })),
                    None => delivery.await,
                }
            })
        })
        .collect();

    let joined = join_all(handles).await;

    subscribers
        .iter()
        .zip(joined)
        .map(|(subscriber, outcome)| {
            let result = outcome.unwrap_or_else(|e| Err(DeliveryError::Aborted(e.to_string())));
            match &result {
                Ok(()) => debug!(subscriber = subscriber.name(), "Broadcast delivered"),
                Err(err) => warn!(
                    subscriber = subscriber.name(),
                    error = %err,
                    "Broadcast delivery failed"
                ),
            }
            DeliveryReport {
                subscriber: subscriber.name().to_string(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwt_types::{Coalition, CompetitionSummary, ContentType, Payload};

    fn message() -> Arc<BroadcastMessage> {
        let coalition = Coalition::new("test", ContentType::Goal, Payload::new(), 0.8, 0.6);
        Arc::new(BroadcastMessage::new(
            coalition,
            1,
            CompetitionSummary {
                winning_strength: 0.48,
                threshold: 0.4,
                competitors: 1,
                intensity: 1.0,
            },
            vec![],
        ))
    }

    struct Rejecting;

    #[async_trait]
    impl Subscriber for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn receive(&self, _: &BroadcastMessage) -> Result<(), DeliveryError> {
            Err(DeliveryError::Rejected("not interested".into()))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Subscriber for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn receive(&self, _: &BroadcastMessage) -> Result<(), DeliveryError> {
            panic!("subscriber crashed")
        }
    }

    struct Slow;

    #[async_trait]
    impl Subscriber for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn receive(&self, _: &BroadcastMessage) -> Result<(), DeliveryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[test]
    fn empty_fan_out_needs_no_runtime() {
        let reports = futures::executor::block_on(fan_out(&[], message(), None));
        assert!(reports.is_empty());
    }

    #[test]
    #[should_panic]
    fn fan_out_outside_runtime_panics() {
        let subscribers: Vec<Arc<dyn Subscriber>> = vec![Arc::new(Rejecting)];
        futures::executor::block_on(fan_out(&subscribers, message(), None));
    }

    #[tokio::test]
    async fn channel_subscriber_receives() {
        let (sub, mut rx) = ChannelSubscriber::new("logger", 8);
        let subs: Vec<Arc<dyn Subscriber>> = vec![Arc::new(sub)];
        let msg = message();

        let reports = fan_out(&subs, msg.clone(), None).await;
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_ok());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, msg.id);
    }

    #[tokio::test]
    async fn failures_do_not_affect_siblings() {
        let (good, mut rx) = ChannelSubscriber::new("good", 8);
        let subs: Vec<Arc<dyn Subscriber>> =
            vec![Arc::new(Rejecting), Arc::new(Panicking), Arc::new(good)];

        let reports = fan_out(&subs, message(), None).await;
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].subscriber, "rejecting");
        assert!(matches!(reports[0].result, Err(DeliveryError::Rejected(_))));
        assert!(matches!(reports[1].result, Err(DeliveryError::Aborted(_))));
        assert!(reports[2].is_ok());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_subscriber_times_out() {
        let (good, _rx) = ChannelSubscriber::new("good", 8);
        let subs: Vec<Arc<dyn Subscriber>> = vec![Arc::new(Slow), Arc::new(good)];

        let reports = fan_out(&subs, message(), Some(Duration::from_millis(100))).await;
        assert_eq!(
            reports[0].result,
            Err(DeliveryError::TimedOut { timeout_ms: 100 })
        );
        assert!(reports[1].is_ok());
    }

    #[tokio::test]
    async fn closed_channel_reports_failure() {
        let (sub, rx) = ChannelSubscriber::new("gone", 1);
        drop(rx);
        let subs: Vec<Arc<dyn Subscriber>> = vec![Arc::new(sub)];

        let reports = fan_out(&subs, message(), None).await;
        assert_eq!(reports[0].result, Err(DeliveryError::ChannelClosed));
    }

    #[tokio::test]
    async fn no_subscribers_is_fine() {
        let reports = fan_out(&[], message(), None).await;
        assert!(reports.is_empty());
    }
}
