//! Bounded reconnection for the push subscription.
//!
//! When the connection drops unexpectedly, the subscription task calls
//! [`reconnect_loop`] to retry a fixed number of times with a fixed
//! inter-attempt delay. Once the attempts are exhausted the channel
//! stays disconnected until the host tears the session down and
//! recreates it -- no infinite retry storm.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{ChannelClient, ChannelConnection};

/// Tunable parameters for the retry strategy.
pub struct ReconnectConfig {
    /// Maximum number of connection attempts per disconnect.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Attempt to (re)connect to the push endpoint.
///
/// Returns `Some(connection)` once a connection succeeds, or `None`
/// once all attempts are exhausted or the `cancel` token is triggered.
pub async fn reconnect_loop(
    client: &ChannelClient,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
) -> Option<ChannelConnection> {
    for attempt in 1..=config.max_attempts {
        tracing::info!(
            attempt,
            max_attempts = config.max_attempts,
            "Connecting to push endpoint",
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Connect cancelled");
                return None;
            }
            result = client.connect() => {
                match result {
                    Ok(conn) => return Some(conn),
                    Err(e) => {
                        tracing::warn!(error = %e, "Connect attempt {attempt} failed");
                    }
                }
            }
        }

        // Wait before the next attempt, respecting cancellation.
        if attempt < config.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(config.delay) => {}
            }
        }
    }

    tracing::error!(
        attempts = config.max_attempts,
        "Reconnect attempts exhausted, staying disconnected",
    );
    None
}
