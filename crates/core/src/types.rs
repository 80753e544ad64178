//! Wire-level record and category types.
//!
//! These mirror the JSON shapes served by the TubeScribe REST API. The
//! client never mutates a record's substantive fields directly -- it
//! only reflects server state (optionally overlaid with a pending
//! [`UpdatePatch`](crate::update::UpdatePatch)).

use serde::{Deserialize, Serialize};

/// All server-assigned primary keys are 64-bit integers.
pub type VideoId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Coarse processing state of a submitted video.
///
/// The finer-grained pipeline sub-phase (downloading, transcribing, ...)
/// travels separately as the free-text `current_step` field and is used
/// only for display ordering, never as a state machine of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    /// The lowercase wire name, as used in stage matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Queued => "queued",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Error => "error",
        }
    }
}

/// A category a video can be filed under.
///
/// Read-only from the client's perspective; used for filtering the
/// collection. `video_count` is denormalized server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: VideoId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub video_count: i64,
    pub created_at: Timestamp,
}

/// One submitted video and its current (or final) state.
///
/// Created server-side on submission, mutated server-side throughout
/// the pipeline, deleted on explicit user command. `summary` is only
/// present once processing completed; `error_message` only when it
/// failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    pub youtube_url: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub current_step: Option<String>,
    /// Completion percentage (0-100), when the pipeline reports one.
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
