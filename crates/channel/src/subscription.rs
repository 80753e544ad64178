//! The live subscription: one connection task, one update buffer.
//!
//! [`LiveChannel`] spawns a background task that connects to the push
//! endpoint, upserts every parsed progress frame into the shared
//! [`UpdateBuffer`], and runs the bounded reconnect when the connection
//! drops. The task is the buffer's single writer; readers take
//! snapshots through [`LiveChannel::updates`].

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{watch, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tubescribe_core::types::VideoId;
use tubescribe_core::update::UpdateBuffer;

use crate::client::{ChannelClient, ChannelConnection};
use crate::messages::{parse_message, PushMessage};
use crate::reconnect::{reconnect_loop, ReconnectConfig};

/// Connectivity of the push subscription.
///
/// Purely informational: merge logic stays correct regardless --
/// absence of updates just means the view falls back to the base
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Why a connection's frame loop ended.
enum SessionEnd {
    /// The host cancelled the subscription.
    Cancelled,
    /// The connection closed or failed.
    Dropped,
}

/// Handle to the live push subscription for one client session.
///
/// Holds at most one live transport connection at a time. Dropped
/// connections are retried per the [`ReconnectConfig`]; after the
/// attempts are exhausted the channel remains disconnected until the
/// host calls [`shutdown`](Self::shutdown) and opens a new one.
pub struct LiveChannel {
    buffer: Arc<RwLock<UpdateBuffer>>,
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl LiveChannel {
    /// Open the subscription and spawn its connection task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn open(ws_url: String, reconnect: ReconnectConfig) -> Self {
        let buffer = Arc::new(RwLock::new(UpdateBuffer::new()));
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_subscription(
            ChannelClient::new(ws_url),
            reconnect,
            Arc::clone(&buffer),
            state_tx,
            cancel.clone(),
        ));

        Self {
            buffer,
            state_rx,
            cancel,
            task,
        }
    }

    /// Current connectivity state.
    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Snapshot of the buffered patches.
    pub async fn updates(&self) -> UpdateBuffer {
        self.buffer.read().await.clone()
    }

    /// Drop the buffered patch for a deleted record.
    pub async fn prune(&self, id: VideoId) {
        self.buffer.write().await.prune(id);
    }

    /// Evict buffered patches for ids absent from the latest full
    /// snapshot, bounding buffer growth over a long session.
    pub async fn retain_ids(&self, ids: &[VideoId]) {
        self.buffer.write().await.retain(|id| ids.contains(&id));
    }

    /// Tear down the subscription: cancel the task and close the
    /// connection. In-flight frames after this point are dropped.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Connection task: connect, process frames, reconnect on drop.
async fn run_subscription(
    client: ChannelClient,
    config: ReconnectConfig,
    buffer: Arc<RwLock<UpdateBuffer>>,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
) {
    let _ = state_tx.send(ConnectionState::Connecting);

    let Some(mut conn) = reconnect_loop(&client, &config, &cancel).await else {
        let _ = state_tx.send(ConnectionState::Disconnected);
        return;
    };

    loop {
        let _ = state_tx.send(ConnectionState::Connected);

        match process_frames(&mut conn, &buffer, &cancel).await {
            SessionEnd::Cancelled => {
                let _ = conn.ws_stream.close(None).await;
                break;
            }
            SessionEnd::Dropped => {
                tracing::warn!("Push connection lost, reconnecting");
                let _ = state_tx.send(ConnectionState::Connecting);
                match reconnect_loop(&client, &config, &cancel).await {
                    Some(next) => conn = next,
                    None => break,
                }
            }
        }
    }

    let _ = state_tx.send(ConnectionState::Disconnected);
}

/// Read frames from one connection until it ends or the host cancels.
async fn process_frames(
    conn: &mut ChannelConnection,
    buffer: &RwLock<UpdateBuffer>,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return SessionEnd::Cancelled,
            frame = conn.ws_stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_frame(&text, buffer).await;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        // Handled automatically by tungstenite.
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Push endpoint closed the connection");
                        return SessionEnd::Dropped;
                    }
                    Some(Ok(_)) => {
                        // Binary / Frame -- nothing on this protocol.
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "WebSocket receive error");
                        return SessionEnd::Dropped;
                    }
                    None => {
                        tracing::info!("WebSocket stream exhausted");
                        return SessionEnd::Dropped;
                    }
                }
            }
        }
    }
}

/// Parse one text frame and upsert its patch into the buffer.
///
/// Malformed frames are logged and discarded; they never tear the
/// connection down.
async fn handle_text_frame(text: &str, buffer: &RwLock<UpdateBuffer>) {
    match parse_message(text) {
        Ok(PushMessage::Connected(greeting)) => {
            tracing::debug!(message = ?greeting.message, "Push endpoint greeting");
        }
        Ok(msg) => {
            if let Some((video_id, patch)) = msg.into_update() {
                tracing::trace!(video_id, "Buffering progress patch");
                buffer.write().await.apply(video_id, patch);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, raw_message = %text, "Failed to parse push frame");
        }
    }
}
