//! WebSocket client for the backend push endpoint.
//!
//! [`ChannelClient`] holds the subscription URL for one backend. Call
//! [`ChannelClient::connect`] to establish a live
//! [`ChannelConnection`] over WebSocket.

use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Configuration handle for the push subscription.
pub struct ChannelClient {
    ws_url: String,
}

/// A live WebSocket connection to the backend push endpoint.
pub struct ChannelConnection {
    /// Unique client ID sent during the WebSocket handshake.
    pub client_id: String,
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

/// Errors from the WebSocket client.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl ChannelClient {
    /// Create a new client targeting the backend push endpoint.
    ///
    /// * `ws_url` - WebSocket URL, e.g. `ws://host:5000/ws`.
    pub fn new(ws_url: String) -> Self {
        Self { ws_url }
    }

    /// Connect to the push endpoint.
    ///
    /// Generates a unique `client_id` (UUID v4) and appends it as a
    /// query parameter so the backend can address this subscriber.
    pub async fn connect(&self) -> Result<ChannelConnection, ChannelError> {
        let client_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}?clientId={}", self.ws_url, client_id);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            ChannelError::Connection(format!("Failed to connect to {}: {e}", self.ws_url))
        })?;

        tracing::info!(client_id = %client_id, "Connected to push endpoint at {}", self.ws_url);

        Ok(ChannelConnection {
            client_id,
            ws_stream,
        })
    }
}
