//! Error handling for the dashboard client
//!
//! Transport failures are absorbed inside the sync loop and never reach the
//! operator. Command failures and configuration problems surface through
//! [`DashboardError`], which carries operator-facing hints.

use std::fmt;
use std::io;

/// Failure of a single exchange with the engine (fetch, command, push channel).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Channel closed")]
    Closed,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Http(status.as_u16())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

/// Main error type for the dashboard client
#[derive(Debug)]
pub enum DashboardError {
    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Engine communication
    Transport(TransportError),
    CommandFailed(String, TransportError), // (command type, cause)
    CommandNotConfirmed(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    Internal(String),
}

impl DashboardError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: hayalet-dash init\n\
                    2. Edit config.toml with the engine address\n\
                    3. Try again",
                    path
                )
            }
            DashboardError::Transport(TransportError::Network(msg)) => {
                format!(
                    "Engine unreachable: {}\n\n\
                    💡 Check:\n\
                    - The engine process is running\n\
                    - api.base_url in config.toml (or HAYALET_API_URL)\n\
                    - Nothing blocks the port",
                    msg
                )
            }
            DashboardError::CommandFailed(kind, cause) => {
                format!(
                    "Command {} was not accepted: {}\n\n\
                    💡 The command was NOT retried. Check the next status\n\
                    update before sending it again.",
                    kind, cause
                )
            }
            DashboardError::CommandNotConfirmed(kind) => {
                format!(
                    "Command {} needs confirmation\n\n\
                    💡 Re-run with --yes to send it",
                    kind
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::ConfigNotFound(_)
            | DashboardError::ConfigParse(_)
            | DashboardError::ConfigValidation(_) => "config",

            DashboardError::Transport(_) => "transport",

            DashboardError::CommandFailed(_, _) | DashboardError::CommandNotConfirmed(_) => "command",

            DashboardError::FileRead(_) | DashboardError::FileWrite(_) => "io",

            DashboardError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            DashboardError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            DashboardError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
            DashboardError::Transport(err) => {
                write!(f, "Transport error: {}", err)
            }
            DashboardError::CommandFailed(kind, cause) => {
                write!(f, "Command {} failed: {}", kind, cause)
            }
            DashboardError::CommandNotConfirmed(kind) => {
                write!(f, "Command {} requires confirmation", kind)
            }
            DashboardError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            DashboardError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }
            DashboardError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Transport(err) | DashboardError::CommandFailed(_, err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for DashboardError {
    fn from(err: TransportError) -> Self {
        DashboardError::Transport(err)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(TransportError::from(err))
    }
}

impl From<io::Error> for DashboardError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DashboardError::FileRead(err.to_string()),
            io::ErrorKind::PermissionDenied => DashboardError::FileWrite(err.to_string()),
            _ => DashboardError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Internal(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        DashboardError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for DashboardError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::NotFound(path) => DashboardError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => DashboardError::FileRead(msg),
            ConfigError::FileWrite(msg) | ConfigError::Serialize(msg) => DashboardError::FileWrite(msg),
            ConfigError::Parse(msg) => DashboardError::ConfigParse(msg),
            ConfigError::Validation(msg) => DashboardError::ConfigValidation(msg),
        }
    }
}

impl From<String> for DashboardError {
    fn from(msg: String) -> Self {
        DashboardError::Internal(msg)
    }
}

impl From<&str> for DashboardError {
    fn from(msg: &str) -> Self {
        DashboardError::Internal(msg.to_string())
    }
}

/// Result type alias using DashboardError
pub type DashboardResult<T> = Result<T, DashboardError>;
