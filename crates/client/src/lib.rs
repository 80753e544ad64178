//! REST boundary and Remote Collection Store for the TubeScribe client.
//!
//! [`api::VideosApi`] wraps the backend's HTTP endpoints; [`store::VideoStore`]
//! owns the fetched snapshot, guards against stale responses from
//! superseded fetches, and applies optimistic removal on delete.

pub mod api;
pub mod store;
