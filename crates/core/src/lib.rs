//! Domain model and pure reconciliation logic for the TubeScribe client.
//!
//! Everything in this crate is side-effect free: record and category
//! types as they appear on the wire, the latest-patch-per-id
//! [`UpdateBuffer`](update::UpdateBuffer), and the view reconciler that
//! overlays buffered patches onto a fetched snapshot.

pub mod stages;
pub mod types;
pub mod update;
pub mod view;
