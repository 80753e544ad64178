//! Session composition for the TubeScribe client.
//!
//! Wires the Remote Collection Store and the Live Update Channel
//! together behind one [`SyncSession`](session::SyncSession) handle and
//! exposes the merged view. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod session;
