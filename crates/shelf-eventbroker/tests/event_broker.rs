use serde::{Deserialize, Serialize};
use shelf_connection::ConnectionState;
use shelf_eventbroker::{Event, EventBroker, EventBrokerError, MemoryBrokerDriver};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pizza {
    name: String,
    size: u32,
}

fn margherita() -> Pizza {
    Pizza {
        name: "Margherita".to_string(),
        size: 15,
    }
}

fn first_created() -> Event {
    Event::new("first", "created")
}

fn second_created() -> Event {
    Event::new("second", "created")
}

async fn connected_broker() -> EventBroker {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();

    let broker = EventBroker::new(Arc::new(MemoryBrokerDriver::new()));
    broker.connect().await.unwrap();
    broker
}

#[tokio::test]
async fn test_publishes_to_multiple_subscribers() {
    let broker = connected_broker().await;

    let mut first = broker.subscribe(&first_created()).await.unwrap();
    let mut second = broker.subscribe(&first_created()).await.unwrap();

    broker.publish(&first_created(), &margherita()).await.unwrap();

    assert_eq!(first.recv_as::<Pizza>().await.unwrap(), Some(margherita()));
    assert_eq!(second.recv_as::<Pizza>().await.unwrap(), Some(margherita()));
    assert_eq!(broker.state(), ConnectionState::Connected);

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_publishes_to_different_channels() {
    let broker = connected_broker().await;

    let mut first = broker.subscribe(&first_created()).await.unwrap();
    let mut second = broker.subscribe(&second_created()).await.unwrap();

    broker.publish(&first_created(), "first").await.unwrap();
    broker.publish(&second_created(), "second").await.unwrap();

    assert_eq!(first.recv_as::<String>().await.unwrap().as_deref(), Some("first"));
    assert_eq!(second.recv_as::<String>().await.unwrap().as_deref(), Some("second"));
    assert!(first.try_recv().is_none());
    assert!(second.try_recv().is_none());

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_events_are_scoped_by_name() {
    let broker = connected_broker().await;

    let mut created = broker.subscribe(&first_created()).await.unwrap();
    broker
        .publish(&Event::new("first", "deleted"), &margherita())
        .await
        .unwrap();

    assert!(created.try_recv().is_none());

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_unsubscribed_receives_nothing_more() {
    let broker = connected_broker().await;

    let mut subscription = broker.subscribe(&first_created()).await.unwrap();
    broker.unsubscribe(&subscription).await.unwrap();
    broker.publish(&first_created(), &margherita()).await.unwrap();

    assert_eq!(subscription.recv().await, None);

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_clear_ends_every_subscription() {
    let broker = connected_broker().await;

    let mut first = broker.subscribe(&first_created()).await.unwrap();
    let mut second = broker.subscribe(&second_created()).await.unwrap();
    broker.clear().await.unwrap();

    assert_eq!(first.recv().await, None);
    assert_eq!(second.recv().await, None);

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_wrong_payload_type_is_a_serialization_error() {
    let broker = connected_broker().await;

    let mut subscription = broker.subscribe(&first_created()).await.unwrap();
    broker.publish(&first_created(), &42).await.unwrap();

    let err = subscription.recv_as::<Pizza>().await.unwrap_err();
    assert!(matches!(err, EventBrokerError::Serialization(_)));

    broker.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_not_connected() {
    let broker = connected_broker().await;
    broker.disconnect().await.unwrap();

    assert!(!broker.is_connected());
    assert!(matches!(
        broker.publish(&first_created(), &margherita()).await,
        Err(EventBrokerError::NotConnected)
    ));
    assert!(matches!(
        broker.subscribe(&first_created()).await,
        Err(EventBrokerError::NotConnected)
    ));
}
