//! Push message types and parser.
//!
//! The backend sends JSON frames with the shape
//! `{"type": "<kind>", "data": {...}}`. This module deserializes them
//! into a strongly-typed [`PushMessage`] enum and normalizes the two
//! progress event shapes into one `(video_id, patch)` representation.

use serde::Deserialize;
use tubescribe_core::types::VideoId;
use tubescribe_core::update::UpdatePatch;

/// All known push frame types.
///
/// Deserialized via the internally-tagged `"type"` field with
/// associated `"data"` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PushMessage {
    /// Greeting sent by the backend right after the handshake.
    #[serde(rename = "connected")]
    Connected(Greeting),

    /// A progress patch with its fields at the top level of the payload.
    #[serde(rename = "video_progress")]
    VideoProgress(ProgressPayload),

    /// Semantically identical to `video_progress`, but the patch fields
    /// may be nested under a `data` key instead of inlined.
    #[serde(rename = "all_updates")]
    AllUpdates(AllUpdatesPayload),
}

/// Payload of the `connected` greeting.
#[derive(Debug, Clone, Deserialize)]
pub struct Greeting {
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload for `video_progress` frames.
///
/// A missing `video_id` makes the frame unparseable by construction --
/// a patch without identity must never reach the buffer.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressPayload {
    pub video_id: VideoId,
    #[serde(flatten)]
    pub patch: UpdatePatch,
}

/// Payload for `all_updates` frames.
///
/// The backend may nest the patch under `data` or present the fields at
/// the top level; [`into_patch`](Self::into_patch) normalizes both.
#[derive(Debug, Clone, Deserialize)]
pub struct AllUpdatesPayload {
    pub video_id: VideoId,
    #[serde(default)]
    pub data: Option<UpdatePatch>,
    #[serde(flatten)]
    pub inline: UpdatePatch,
}

impl AllUpdatesPayload {
    /// The nested patch when present, otherwise the inlined fields.
    pub fn into_patch(self) -> UpdatePatch {
        self.data.unwrap_or(self.inline)
    }
}

impl PushMessage {
    /// Normalize a progress frame into its buffer representation.
    ///
    /// Returns `None` for non-progress frames (the greeting).
    pub fn into_update(self) -> Option<(VideoId, UpdatePatch)> {
        match self {
            PushMessage::Connected(_) => None,
            PushMessage::VideoProgress(p) => Some((p.video_id, p.patch)),
            PushMessage::AllUpdates(p) => Some((p.video_id, p.into_patch())),
        }
    }
}

/// Parse a push text frame into a typed enum.
///
/// Returns `Err` for malformed JSON, unknown `type` values, or payloads
/// missing the `video_id` identity field. Callers log and discard these
/// -- a bad frame must never crash the reconciler.
pub fn parse_message(text: &str) -> Result<PushMessage, serde_json::Error> {
    serde_json::from_str(text)
}
