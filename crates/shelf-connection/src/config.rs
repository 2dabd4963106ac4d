//! Connection manager configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default interval between two liveness checks
pub const DEFAULT_MONITORING_INTERVAL_MS: u64 = 3000;

fn default_monitoring_interval_ms() -> u64 {
    DEFAULT_MONITORING_INTERVAL_MS
}

/// What `connect()` reports when the underlying connect fails
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectFailurePolicy {
    /// Log the failure, resolve successfully and let the monitor retry
    #[default]
    Retry,
    /// Return the failure to every waiting caller; no monitor is started
    FailFast,
}

/// Configuration for a [`ConnectionManager`](crate::ConnectionManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Name used as the log prefix
    pub name: String,

    /// Milliseconds between two liveness checks
    #[serde(default = "default_monitoring_interval_ms")]
    pub monitoring_interval_ms: u64,

    #[serde(default)]
    pub failure_policy: ConnectFailurePolicy,
}

impl ConnectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            monitoring_interval_ms: DEFAULT_MONITORING_INTERVAL_MS,
            failure_policy: ConnectFailurePolicy::default(),
        }
    }

    pub fn with_monitoring_interval(mut self, interval: Duration) -> Self {
        self.monitoring_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_failure_policy(mut self, policy: ConnectFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn monitoring_interval(&self) -> Duration {
        Duration::from_millis(self.monitoring_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("database");
        assert_eq!(config.monitoring_interval(), Duration::from_millis(3000));
        assert_eq!(config.failure_policy, ConnectFailurePolicy::Retry);
    }

    #[test]
    fn test_config_from_json_applies_defaults() {
        let config: ConnectionConfig = serde_json::from_str(r#"{"name":"cache"}"#).unwrap();
        assert_eq!(config.monitoring_interval_ms, DEFAULT_MONITORING_INTERVAL_MS);

        let config: ConnectionConfig = serde_json::from_str(
            r#"{"name":"cache","monitoring_interval_ms":10,"failure_policy":"fail_fast"}"#,
        )
        .unwrap();
        assert_eq!(config.monitoring_interval(), Duration::from_millis(10));
        assert_eq!(config.failure_policy, ConnectFailurePolicy::FailFast);
    }

    #[test]
    fn test_oversized_interval_saturates() {
        let config = ConnectionConfig::new("database").with_monitoring_interval(Duration::MAX);
        assert_eq!(config.monitoring_interval_ms, u64::MAX);
    }
}
