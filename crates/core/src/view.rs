//! The view reconciler: pure merge of a fetched snapshot with the
//! update buffer.
//!
//! Recomputed from scratch on every read -- the two data sources are
//! never locked against each other, so a fetch completing and a push
//! event arriving in either order always converge to the same view.

use crate::types::VideoRecord;
use crate::update::{UpdateBuffer, UpdatePatch};

/// Overlay a patch onto a base record, field by field.
///
/// Only fields present in the patch override; everything else is
/// retained from the base. Identity and server-owned metadata
/// (timestamps, category, urls) are never patched.
pub fn merge_record(base: &VideoRecord, patch: &UpdatePatch) -> VideoRecord {
    let mut merged = base.clone();
    if let Some(status) = patch.status {
        merged.status = status;
    }
    if let Some(ref step) = patch.current_step {
        merged.current_step = Some(step.clone());
    }
    if let Some(progress) = patch.progress {
        merged.progress = Some(progress);
    }
    if let Some(ref message) = patch.error_message {
        merged.error_message = Some(message.clone());
    }
    if let Some(ref summary) = patch.summary {
        merged.summary = Some(summary.clone());
    }
    merged
}

/// Produce the merged, render-ready record list.
///
/// For every base record, look up a pending patch by id and overlay it.
/// Output order follows the base collection (server-determined order is
/// preserved; the buffer never reorders, adds, or removes records).
pub fn view(base: &[VideoRecord], updates: &UpdateBuffer) -> Vec<VideoRecord> {
    base.iter()
        .map(|record| match updates.get(record.id) {
            Some(patch) => merge_record(record, patch),
            None => record.clone(),
        })
        .collect()
}
