use async_trait::async_trait;

/// A resource with a connection that can be opened, closed and checked for liveness
///
/// Implementations report failures through `anyhow` so the lifecycle
/// controller stays independent of backend error types.
#[async_trait]
pub trait Connectable: Send + Sync {
    /// Liveness flag, polled by the monitoring loop
    fn is_connected(&self) -> bool;

    /// Open the underlying connection
    async fn connect(&self) -> anyhow::Result<()>;

    /// Close the underlying connection
    async fn disconnect(&self) -> anyhow::Result<()>;
}
