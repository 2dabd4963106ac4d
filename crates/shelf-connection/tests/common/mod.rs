use async_trait::async_trait;
use shelf_connection::Connectable;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Install a test subscriber once per test binary; `RUST_LOG` overrides the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A fake resource whose connect/disconnect take `delay` and can be made to fail
pub struct MockConnectable {
    delay: Duration,
    alive: AtomicBool,
    failing: AtomicBool,
    failing_disconnect: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

#[allow(dead_code)]
impl MockConnectable {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            alive: AtomicBool::new(false),
            failing: AtomicBool::new(false),
            failing_disconnect: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        }
    }

    /// Drop the connection and make every following connect fail
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Let connects succeed again
    pub fn restore(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    pub fn fail_disconnect(&self) {
        self.failing_disconnect.store(true, Ordering::SeqCst);
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connectable for MockConnectable {
    fn is_connected(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> anyhow::Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }

        self.alive.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if self.failing_disconnect.load(Ordering::SeqCst) {
            anyhow::bail!("socket busy");
        }

        self.alive.store(false, Ordering::SeqCst);
        Ok(())
    }
}
