//! One client session: store + channel + merged view.

use tubescribe_channel::subscription::{ConnectionState, LiveChannel};
use tubescribe_client::api::VideosApi;
use tubescribe_client::store::{LoadOutcome, StoreError, VideoStore};
use tubescribe_core::types::{Category, VideoId, VideoRecord};
use tubescribe_core::view;

use crate::config::SessionConfig;

/// Composition root for the client synchronization layer.
///
/// Owns exactly one [`VideoStore`] (the base snapshot) and one
/// [`LiveChannel`] (the update buffer). The two sources are never
/// locked against each other; [`merged_view`](Self::merged_view)
/// recomputes the overlay from scratch on every read.
pub struct SyncSession {
    api: VideosApi,
    store: VideoStore,
    channel: LiveChannel,
}

impl SyncSession {
    /// Open a session: build the REST clients over one shared
    /// connection pool and start the push subscription.
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(config: &SessionConfig) -> Self {
        let http = reqwest::Client::new();
        let store = VideoStore::new(VideosApi::with_client(
            http.clone(),
            config.api_url.clone(),
        ));
        let api = VideosApi::with_client(http, config.api_url.clone());
        let channel = LiveChannel::open(config.ws_url.clone(), config.reconnect());

        Self {
            api,
            store,
            channel,
        }
    }

    /// Refetch the collection, optionally scoped to one category.
    ///
    /// After an applied unfiltered reload, buffered patches for ids no
    /// longer present are evicted so the buffer cannot grow without
    /// bound over a long session.
    pub async fn refresh(&self, category_id: Option<VideoId>) -> Result<LoadOutcome, StoreError> {
        let outcome = self.store.load(category_id).await?;
        if category_id.is_none() && matches!(outcome, LoadOutcome::Applied(_)) {
            let ids = self.store.snapshot_ids().await;
            self.channel.retain_ids(&ids).await;
        }
        Ok(outcome)
    }

    /// Submit a batch of video URLs; returns the newly queued records.
    pub async fn submit(&self, urls: &[String]) -> Result<Vec<VideoRecord>, StoreError> {
        self.store.submit(urls).await
    }

    /// Delete a video and prune its buffered patch.
    ///
    /// On failure the snapshot and buffer are untouched and the caller
    /// surfaces the error.
    pub async fn remove(&self, id: VideoId) -> Result<(), StoreError> {
        self.store.remove(id).await?;
        self.channel.prune(id).await;
        Ok(())
    }

    /// The merged, render-ready record list: base snapshot overlaid
    /// with the freshest buffered patch per record.
    pub async fn merged_view(&self) -> Vec<VideoRecord> {
        let base = self.store.snapshot().await;
        let updates = self.channel.updates().await;
        view::view(&base, &updates)
    }

    /// Fetch the category list for filtering.
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.api.list_categories().await?)
    }

    /// Message of the most recent failed fetch, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.store.last_error().await
    }

    /// Connectivity of the push subscription.
    pub fn connection_state(&self) -> ConnectionState {
        self.channel.connection_state()
    }

    /// Tear the session down: unsubscribe from the push channel. Any
    /// in-flight fetch response is discarded by the store's
    /// stale-response guard once the session is gone.
    pub async fn shutdown(self) {
        self.channel.shutdown().await;
    }
}
