//! Connection lifecycle controller
//!
//! Wraps a [`Connectable`] with a state machine, deduplicates concurrent
//! connect/disconnect calls and watches the connection in the background.
//!
//! Underlying connect and disconnect operations run in their own tasks, so
//! a caller that stops waiting does not cancel the operation for the other
//! waiters. The in-flight outcome is kept as a shared future and handed to
//! every caller that arrives before it resolves.

use crate::config::{ConnectFailurePolicy, ConnectionConfig};
use crate::error::{ConnectionError, Result};
use crate::state::ConnectionState;
use crate::traits::Connectable;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, MutexGuard};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type Outcome = Shared<BoxFuture<'static, Result<()>>>;

/// Mutable part of the controller, only touched under the lock
#[derive(Default)]
struct Lifecycle {
    state: ConnectionState,
    connecting: Option<Outcome>,
    disconnecting: Option<Outcome>,
    monitor: Option<CancellationToken>,
}

struct Inner {
    name: String,
    connectable: Arc<dyn Connectable>,
    monitoring_interval: Duration,
    failure_policy: ConnectFailurePolicy,
    lifecycle: Mutex<Lifecycle>,
}

/// Manages connect/disconnect and health monitoring for a [`Connectable`]
///
/// Cloning is cheap; clones share the same lifecycle.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    pub fn new(config: ConnectionConfig, connectable: Arc<dyn Connectable>) -> Self {
        Self {
            inner: Arc::new(Inner {
                monitoring_interval: config.monitoring_interval(),
                failure_policy: config.failure_policy,
                name: config.name,
                connectable,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    /// Whether the background monitoring loop is running
    pub fn is_monitoring(&self) -> bool {
        self.inner.lock().monitor.is_some()
    }

    /// Connect the underlying resource and start monitoring it.
    ///
    /// Does nothing when already connected. Concurrent callers share the
    /// outcome of a single underlying connect.
    pub async fn connect(&self) -> Result<()> {
        let outcome = {
            let mut lifecycle = self.inner.lock();

            if let Some(pending) = &lifecycle.connecting {
                warn!("{} -> connect already in progress", self.inner.name);
                pending.clone()
            } else if lifecycle.state != ConnectionState::Disconnected {
                warn!("{} -> connect in invalid state", self.inner.name);
                return Ok(());
            } else {
                self.inner.begin_connect(&mut lifecycle, true)
            }
        };

        self.inner.settle_connect(outcome.await)
    }

    /// Stop monitoring and disconnect the underlying resource.
    ///
    /// Does nothing when not connected. Concurrent callers share the outcome
    /// of a single underlying disconnect. A connect in flight is awaited
    /// first, then disconnected if it succeeded. A failed disconnect leaves
    /// the state at `CONNECTED` and is returned to every caller.
    pub async fn disconnect(&self) -> Result<()> {
        loop {
            let pending = {
                let mut lifecycle = self.inner.lock();

                if let Some(outcome) = &lifecycle.disconnecting {
                    warn!("{} -> disconnect already in progress", self.inner.name);
                    Pending::Disconnect(outcome.clone())
                } else if let Some(outcome) = lifecycle.connecting.clone() {
                    if lifecycle.monitor.is_some() {
                        self.inner.stop_monitoring(&mut lifecycle);
                    }
                    info!("{} -> waiting for connect before disconnecting", self.inner.name);
                    Pending::Connect(outcome)
                } else if lifecycle.state != ConnectionState::Connected {
                    if lifecycle.monitor.is_some() {
                        self.inner.stop_monitoring(&mut lifecycle);
                    }
                    warn!("{} -> disconnect in invalid state", self.inner.name);
                    return Ok(());
                } else {
                    self.inner.stop_monitoring(&mut lifecycle);
                    Pending::Disconnect(self.inner.begin_disconnect(&mut lifecycle))
                }
            };

            match pending {
                Pending::Disconnect(outcome) => return outcome.await,
                // Either way the next pass sees the state the connect left
                Pending::Connect(outcome) => {
                    let _ = outcome.await;
                }
            }
        }
    }
}

/// In-flight operation a `disconnect()` call waits on
enum Pending {
    Connect(Outcome),
    Disconnect(Outcome),
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock()
    }

    fn begin_connect(self: &Arc<Self>, lifecycle: &mut Lifecycle, requested: bool) -> Outcome {
        lifecycle.state = ConnectionState::Connecting;

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_connect(requested).await });

        let name = self.name.clone();
        let outcome = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(ConnectionError::task_aborted(name, "connect", e)))
        }
        .boxed()
        .shared();

        lifecycle.connecting = Some(outcome.clone());
        outcome
    }

    /// Runs in its own task. `requested` is true when the attempt comes from
    /// `connect()` rather than the monitor.
    async fn run_connect(self: Arc<Self>, requested: bool) -> Result<()> {
        let result = self.connectable.connect().await;

        let mut lifecycle = self.lock();
        lifecycle.connecting = None;

        match result {
            Ok(()) => {
                lifecycle.state = ConnectionState::Connected;
                info!("{} -> connected successfully", self.name);

                if requested {
                    self.start_monitoring(&mut lifecycle);
                }
                Ok(())
            }
            Err(e) => {
                lifecycle.state = ConnectionState::Disconnected;
                error!("{} -> connection failure: {:#}", self.name, e);

                if requested && self.failure_policy == ConnectFailurePolicy::Retry {
                    self.start_monitoring(&mut lifecycle);
                }
                Err(ConnectionError::connect_failed(&self.name, &e))
            }
        }
    }

    fn settle_connect(&self, result: Result<()>) -> Result<()> {
        match (result, self.failure_policy) {
            (Err(e), ConnectFailurePolicy::FailFast) => Err(e),
            _ => Ok(()),
        }
    }

    fn begin_disconnect(self: &Arc<Self>, lifecycle: &mut Lifecycle) -> Outcome {
        lifecycle.state = ConnectionState::Disconnecting;

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_disconnect().await });

        let name = self.name.clone();
        let outcome = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(ConnectionError::task_aborted(name, "disconnect", e)))
        }
        .boxed()
        .shared();

        lifecycle.disconnecting = Some(outcome.clone());
        outcome
    }

    async fn run_disconnect(self: Arc<Self>) -> Result<()> {
        let result = self.connectable.disconnect().await;

        let mut lifecycle = self.lock();
        lifecycle.disconnecting = None;

        match result {
            Ok(()) => {
                lifecycle.state = ConnectionState::Disconnected;
                info!("{} -> disconnected successfully", self.name);
                Ok(())
            }
            Err(e) => {
                lifecycle.state = ConnectionState::Connected;
                error!("{} -> disconnection failure: {:#}", self.name, e);
                Err(ConnectionError::disconnect_failed(&self.name, &e))
            }
        }
    }

    fn start_monitoring(self: &Arc<Self>, lifecycle: &mut Lifecycle) {
        if lifecycle.monitor.is_some() {
            warn!("{} -> monitoring already started", self.name);
            return;
        }

        let token = CancellationToken::new();
        tokio::spawn(monitor(
            Arc::downgrade(self),
            token.clone(),
            self.monitoring_interval,
        ));
        lifecycle.monitor = Some(token);

        info!("{} -> monitoring started", self.name);
    }

    fn stop_monitoring(&self, lifecycle: &mut Lifecycle) {
        match lifecycle.monitor.take() {
            Some(token) => {
                token.cancel();
                info!("{} -> monitoring stopped", self.name);
            }
            None => warn!("{} -> monitoring already stopped", self.name),
        }
    }

    /// One monitoring pass: reconnect when the resource reports it is down
    async fn check_connection(self: &Arc<Self>, token: &CancellationToken) {
        debug!("{} -> monitoring connection", self.name);

        if self.connectable.is_connected() {
            return;
        }

        let outcome = {
            let mut lifecycle = self.lock();

            if token.is_cancelled() {
                return;
            }

            match &lifecycle.connecting {
                Some(pending) => pending.clone(),
                None => {
                    warn!("{} -> connection lost", self.name);
                    lifecycle.state = ConnectionState::Disconnected;
                    self.begin_connect(&mut lifecycle, false)
                }
            }
        };

        // Failures are logged by the connect task; the next pass retries.
        let _ = outcome.await;
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(token) = self.lifecycle.get_mut().monitor.take() {
            token.cancel();
        }
    }
}

/// Monitoring loop; runs until cancelled or the manager is dropped
async fn monitor(inner: Weak<Inner>, token: CancellationToken, interval: Duration) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let Some(inner) = inner.upgrade() else {
            break;
        };

        inner.check_connection(&token).await;
    }
}
