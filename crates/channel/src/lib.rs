//! The Live Update Channel.
//!
//! Maintains one persistent WebSocket subscription per client session,
//! parses incoming push frames into typed patches, and buffers the
//! latest patch per video id for the view reconciler to overlay.
//! Transport failures degrade to "no live updates": the merged view
//! stays correct, it just falls back to the fetched base records.

pub mod client;
pub mod messages;
pub mod reconnect;
pub mod subscription;
