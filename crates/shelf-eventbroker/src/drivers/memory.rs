use crate::error::{EventBrokerError, Result};
use crate::traits::{BrokerDriver, Event, Publication, Subscription, SubscriptionId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

type Sender = mpsc::UnboundedSender<serde_json::Value>;
type Subscribers = HashMap<Event, Vec<(SubscriptionId, Sender)>>;

/// In-process broker; every subscription is dropped on disconnect
#[derive(Default)]
pub struct MemoryBrokerDriver {
    subscribers: Mutex<Subscribers>,
    connected: AtomicBool,
    last_id: AtomicU64,
}

impl MemoryBrokerDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions to `event`
    pub fn subscriber_count(&self, event: &Event) -> usize {
        self.subscribers.lock().get(event).map_or(0, Vec::len)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EventBrokerError::NotConnected)
        }
    }
}

#[async_trait]
impl BrokerDriver for MemoryBrokerDriver {
    fn name(&self) -> &str {
        "memory-broker"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        self.subscribers.lock().clear();
        Ok(())
    }

    async fn publish(&self, publication: Publication) -> Result<()> {
        self.ensure_connected()?;

        let mut subscribers = self.subscribers.lock();
        let Some(senders) = subscribers.get_mut(&publication.event) else {
            debug!("No subscribers for {}", publication.event);
            return Ok(());
        };

        // Senders whose subscription was dropped are pruned on the way
        senders.retain(|(_, sender)| sender.send(publication.data.clone()).is_ok());
        debug!("Delivered {} to {} subscribers", publication.event, senders.len());

        if senders.is_empty() {
            subscribers.remove(&publication.event);
        }
        Ok(())
    }

    async fn subscribe(&self, event: Event) -> Result<Subscription> {
        self.ensure_connected()?;

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (sender, receiver) = mpsc::unbounded_channel();

        self.subscribers
            .lock()
            .entry(event.clone())
            .or_default()
            .push((id, sender));

        Ok(Subscription::new(id, event, receiver))
    }

    async fn unsubscribe(&self, subscription: &Subscription) -> Result<()> {
        self.ensure_connected()?;

        let mut subscribers = self.subscribers.lock();
        if let Some(senders) = subscribers.get_mut(subscription.event()) {
            senders.retain(|(id, _)| *id != subscription.id());
            if senders.is_empty() {
                subscribers.remove(subscription.event());
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_connected()?;
        self.subscribers.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn created() -> Event {
        Event::new("pizzas", "created")
    }

    fn publication(data: serde_json::Value) -> Publication {
        Publication {
            event: created(),
            data,
        }
    }

    async fn connected() -> MemoryBrokerDriver {
        let driver = MemoryBrokerDriver::new();
        driver.connect().await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_dropped_subscriptions_are_pruned() {
        let driver = connected().await;

        let kept = driver.subscribe(created()).await.unwrap();
        let dropped = driver.subscribe(created()).await.unwrap();
        assert_eq!(driver.subscriber_count(&created()), 2);

        drop(dropped);
        driver.publish(publication(json!(1))).await.unwrap();

        assert_eq!(driver.subscriber_count(&created()), 1);
        drop(kept);
    }

    #[tokio::test]
    async fn test_unsubscribe_ends_the_stream() {
        let driver = connected().await;
        let mut subscription = driver.subscribe(created()).await.unwrap();

        driver.publish(publication(json!("queued"))).await.unwrap();
        driver.unsubscribe(&subscription).await.unwrap();
        driver.publish(publication(json!("missed"))).await.unwrap();

        assert_eq!(subscription.recv().await, Some(json!("queued")));
        assert_eq!(subscription.recv().await, None);
        assert_eq!(driver.subscriber_count(&created()), 0);

        // Unknown subscriptions are ignored
        driver.unsubscribe(&subscription).await.unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_drops_subscriptions() {
        let driver = connected().await;
        let mut subscription = driver.subscribe(created()).await.unwrap();

        driver.disconnect().await.unwrap();

        assert_eq!(subscription.recv().await, None);
        assert!(matches!(
            driver.publish(publication(json!(1))).await,
            Err(EventBrokerError::NotConnected)
        ));
    }
}
