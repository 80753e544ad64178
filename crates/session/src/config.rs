//! Session configuration loaded from environment variables.

use std::time::Duration;

use tubescribe_channel::reconnect::ReconnectConfig;

/// Connection endpoints and retry policy for one client session.
///
/// All fields have defaults suitable for a local backend. Override via
/// environment variables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base REST URL (default: `http://localhost:5000/api`).
    pub api_url: String,
    /// Push endpoint WebSocket URL (default: `ws://localhost:5000/ws`).
    pub ws_url: String,
    /// Reconnect attempts per disconnect (default: `5`).
    pub reconnect_attempts: u32,
    /// Fixed delay between attempts in seconds (default: `1`).
    pub reconnect_delay_secs: u64,
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                     |
    /// |---------------------------------|-----------------------------|
    /// | `TUBESCRIBE_API_URL`            | `http://localhost:5000/api` |
    /// | `TUBESCRIBE_WS_URL`             | `ws://localhost:5000/ws`    |
    /// | `TUBESCRIBE_RECONNECT_ATTEMPTS` | `5`                         |
    /// | `TUBESCRIBE_RECONNECT_DELAY_SECS` | `1`                       |
    pub fn from_env() -> Self {
        let api_url = std::env::var("TUBESCRIBE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".into());

        let ws_url =
            std::env::var("TUBESCRIBE_WS_URL").unwrap_or_else(|_| "ws://localhost:5000/ws".into());

        let reconnect_attempts: u32 = std::env::var("TUBESCRIBE_RECONNECT_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let reconnect_delay_secs: u64 = std::env::var("TUBESCRIBE_RECONNECT_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        Self {
            api_url,
            ws_url,
            reconnect_attempts,
            reconnect_delay_secs,
        }
    }

    /// Retry policy for the live update channel.
    pub fn reconnect(&self) -> ReconnectConfig {
        ReconnectConfig {
            max_attempts: self.reconnect_attempts,
            delay: Duration::from_secs(self.reconnect_delay_secs),
        }
    }
}
