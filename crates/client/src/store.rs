//! The Remote Collection Store.
//!
//! [`VideoStore`] exclusively owns the base record list, replaced
//! wholesale on each successful fetch. A monotonic request sequence
//! number guards against stale responses: only the most recently
//! *issued* load's response is allowed to win, so a slow first fetch
//! can never overwrite the result of a second one issued after it.
//! Failed refreshes keep the previous snapshot visible and surface an
//! error flag instead of flashing an empty list.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tubescribe_core::types::{VideoId, VideoRecord};

use crate::api::{ApiError, VideosApi};

/// Errors surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What happened to a load request once its response resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the snapshot; carries the record count.
    Applied(usize),
    /// A later load was issued before this response arrived, so it was
    /// discarded.
    Superseded,
}

#[derive(Default)]
struct StoreState {
    videos: Vec<VideoRecord>,
    /// Category filter of the most recently applied load; implicit
    /// refetches after a submit reuse it.
    filter: Option<VideoId>,
    last_error: Option<String>,
}

/// Owns the authoritative client-side snapshot of the video collection.
///
/// Thread-safe via interior locking; designed to be wrapped in `Arc`
/// and shared with the session.
pub struct VideoStore {
    api: VideosApi,
    /// Sequence number of the most recently issued load.
    issued: AtomicU64,
    state: RwLock<StoreState>,
}

impl VideoStore {
    /// Create an empty store backed by the given API client.
    pub fn new(api: VideosApi) -> Self {
        Self {
            api,
            issued: AtomicU64::new(0),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Fetch the collection, optionally scoped to one category, and
    /// replace the snapshot atomically.
    ///
    /// Returns [`LoadOutcome::Superseded`] without touching the snapshot
    /// if another load was issued while this one was in flight. On
    /// fetch failure the previous snapshot is retained and the error
    /// flag is set.
    pub async fn load(&self, category_id: Option<VideoId>) -> Result<LoadOutcome, StoreError> {
        let seq = self.begin_load();
        let result = self.api.list_videos(category_id).await;
        self.complete_load(seq, category_id, result).await
    }

    /// Submit a batch of video URLs.
    ///
    /// Fails as a unit: on a rejected batch no records are assumed
    /// created. On success an implicit refetch picks up the newly
    /// queued records; a failure of that refetch only sets the error
    /// flag (the created records are still returned for optimistic UI).
    pub async fn submit(&self, urls: &[String]) -> Result<Vec<VideoRecord>, StoreError> {
        let created = self.api.add_videos(urls).await?;
        tracing::info!(count = created.len(), "Submitted video batch");

        let filter = self.state.read().await.filter;
        if let Err(e) = self.load(filter).await {
            tracing::warn!(error = %e, "Refetch after submit failed");
        }
        Ok(created)
    }

    /// Delete a video.
    ///
    /// Removal from the local snapshot is optimistic but only happens
    /// after the backend confirmed the delete; on failure the snapshot
    /// is untouched and the caller surfaces the error.
    pub async fn remove(&self, id: VideoId) -> Result<(), StoreError> {
        self.api.delete_video(id).await?;
        self.remove_local(id).await;
        tracing::info!(video_id = id, "Video deleted");
        Ok(())
    }

    /// Clone of the current snapshot, in server order.
    pub async fn snapshot(&self) -> Vec<VideoRecord> {
        self.state.read().await.videos.clone()
    }

    /// The ids present in the current snapshot.
    pub async fn snapshot_ids(&self) -> Vec<VideoId> {
        self.state.read().await.videos.iter().map(|v| v.id).collect()
    }

    /// Message of the most recent failed fetch, cleared by the next
    /// successful one. Non-blocking: data stays visible alongside it.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    // ---- issue/complete seam (unit-testable without a server) ----

    /// Issue a new load sequence number.
    pub(crate) fn begin_load(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Resolve a load response against the stale-response guard.
    pub(crate) async fn complete_load(
        &self,
        seq: u64,
        category_id: Option<VideoId>,
        result: Result<Vec<VideoRecord>, ApiError>,
    ) -> Result<LoadOutcome, StoreError> {
        let mut state = self.state.write().await;
        if seq != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(seq, "Discarding superseded load response");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(videos) => {
                let count = videos.len();
                state.videos = videos;
                state.filter = category_id;
                state.last_error = None;
                tracing::debug!(count, "Snapshot replaced");
                Ok(LoadOutcome::Applied(count))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, retaining previous snapshot");
                state.last_error = Some(e.to_string());
                Err(StoreError::Api(e))
            }
        }
    }

    /// Drop a record from the local snapshot.
    pub(crate) async fn remove_local(&self, id: VideoId) {
        self.state.write().await.videos.retain(|v| v.id != id);
    }
}
