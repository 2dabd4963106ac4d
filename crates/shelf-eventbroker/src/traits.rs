use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// A named event within a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub channel: String,
    pub name: String,
}

impl Event {
    pub fn new(channel: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.channel, self.name)
    }
}

/// An event together with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub event: Event,
    pub data: serde_json::Value,
}

pub type SubscriptionId = u64;

/// Receiving end of a subscription
///
/// Payloads queue up until received. The stream ends once the subscription
/// is removed, the broker is cleared or it disconnects.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    event: Event,
    receiver: mpsc::UnboundedReceiver<serde_json::Value>,
}

impl Subscription {
    pub fn new(
        id: SubscriptionId,
        event: Event,
        receiver: mpsc::UnboundedReceiver<serde_json::Value>,
    ) -> Self {
        Self {
            id,
            event,
            receiver,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Next payload, `None` when the stream has ended
    pub async fn recv(&mut self) -> Option<serde_json::Value> {
        self.receiver.recv().await
    }

    /// Next payload deserialized into `T`
    pub async fn recv_as<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.receiver.recv().await {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    /// Payload already queued, without waiting
    pub fn try_recv(&mut self) -> Option<serde_json::Value> {
        self.receiver.try_recv().ok()
    }
}

/// Transport of an [`EventBroker`](crate::EventBroker)
#[async_trait]
pub trait BrokerDriver: Send + Sync {
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    /// Deliver to every current subscriber of the event
    async fn publish(&self, publication: Publication) -> Result<()>;

    async fn subscribe(&self, event: Event) -> Result<Subscription>;

    /// Removing an unknown subscription is not an error
    async fn unsubscribe(&self, subscription: &Subscription) -> Result<()>;

    /// Drop every subscription
    async fn clear(&self) -> Result<()>;
}
