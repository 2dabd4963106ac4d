use thiserror::Error;

/// Errors reported by the connection lifecycle controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The underlying connect operation failed
    #[error("{name} -> connection failure: {message}")]
    ConnectFailed { name: String, message: String },

    /// The underlying disconnect operation failed
    #[error("{name} -> disconnection failure: {message}")]
    DisconnectFailed { name: String, message: String },

    /// The task running a connect or disconnect panicked or was cancelled
    #[error("{name} -> {operation} task aborted: {message}")]
    TaskAborted {
        name: String,
        operation: &'static str,
        message: String,
    },
}

impl ConnectionError {
    pub fn connect_failed(name: impl Into<String>, error: &anyhow::Error) -> Self {
        ConnectionError::ConnectFailed {
            name: name.into(),
            message: format!("{:#}", error),
        }
    }

    pub fn disconnect_failed(name: impl Into<String>, error: &anyhow::Error) -> Self {
        ConnectionError::DisconnectFailed {
            name: name.into(),
            message: format!("{:#}", error),
        }
    }

    pub fn task_aborted(
        name: impl Into<String>,
        operation: &'static str,
        error: tokio::task::JoinError,
    ) -> Self {
        ConnectionError::TaskAborted {
            name: name.into(),
            operation,
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectionError>;
