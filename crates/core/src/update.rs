//! Partial progress patches and the latest-patch-per-id buffer.
//!
//! The push channel delivers field-sparse [`UpdatePatch`]es, never full
//! records. [`UpdateBuffer`] keeps only the most recently received
//! patch per video id; the actual field-level overlay onto a
//! [`VideoRecord`](crate::types::VideoRecord) happens in
//! [`view`](crate::view) at read time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ProcessingStatus, VideoId};

/// A field-sparse patch describing the freshest known progress for one
/// video. Absent fields mean "no information", not "reset to empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl UpdatePatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == UpdatePatch::default()
    }
}

/// Latest-patch-per-id mapping maintained by the live update channel.
///
/// Conflict policy is last-write-wins: a later patch for the same id
/// fully replaces the earlier one (no field-level merge across
/// patches). The transport gives no ordering guarantees, so "later"
/// means most recently received. Entries for ids not (yet) present in
/// the base snapshot are kept and applied lazily once the record
/// appears; [`retain`](Self::retain) bounds that growth after a full
/// reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuffer {
    entries: HashMap<VideoId, UpdatePatch>,
}

impl UpdateBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the patch for `id`, replacing any earlier patch wholesale.
    ///
    /// Re-applying an identical patch is a no-op in effect, so duplicate
    /// delivery from the transport is harmless.
    pub fn apply(&mut self, id: VideoId, patch: UpdatePatch) {
        self.entries.insert(id, patch);
    }

    /// The pending patch for `id`, if any.
    pub fn get(&self, id: VideoId) -> Option<&UpdatePatch> {
        self.entries.get(&id)
    }

    /// Drop the entry for a deleted record.
    ///
    /// Ids are not reused by the backend, but a stale entry must never
    /// resurface if that ever changed.
    pub fn prune(&mut self, id: VideoId) {
        self.entries.remove(&id);
    }

    /// Evict entries whose id is absent from the latest base snapshot.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(VideoId) -> bool,
    {
        self.entries.retain(|id, _| keep(*id));
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no patches are buffered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
