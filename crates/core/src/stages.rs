//! Pipeline stage ordering for the progress indicator.
//!
//! The backend reports the fine-grained sub-phase as free text (e.g.
//! `"Transcribing audio..."`). The presentation layer renders a fixed
//! sequence of stage icons and needs to know which stages a record has
//! reached. Matching is a case-insensitive substring check against the
//! step label, falling back to the coarse status. Fragile by nature --
//! it couples to backend wording -- but that is the existing contract.

use crate::types::VideoRecord;

/// Display order of pipeline stages, from submission to completion.
pub const PIPELINE_STAGES: [&str; 6] = [
    "queued",
    "downloading",
    "transcribing",
    "summarizing",
    "categorizing",
    "completed",
];

/// Ordinal of the stage this record has reached, or `None` if the
/// record is before all stages (no step label or status matched).
///
/// The first stage whose key occurs (case-insensitively) in
/// `current_step`, or whose key equals the coarse status, wins.
pub fn progress_stage_index(record: &VideoRecord) -> Option<usize> {
    let step = record.current_step.as_deref().map(str::to_lowercase);
    PIPELINE_STAGES.iter().position(|stage| {
        step.as_deref().is_some_and(|s| s.contains(stage)) || record.status.as_str() == *stage
    })
}

/// Whether the progress indicator should render for this record.
///
/// Only records still moving through the pipeline show progress;
/// completed and failed records show their result instead.
pub fn should_show_progress(record: &VideoRecord) -> bool {
    use crate::types::ProcessingStatus::{Processing, Queued};
    matches!(record.status, Queued | Processing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProcessingStatus, VideoRecord};

    fn record(status: ProcessingStatus, step: Option<&str>) -> VideoRecord {
        let now = chrono::Utc::now();
        VideoRecord {
            id: 1,
            youtube_url: "https://youtu.be/abc".into(),
            title: "Test".into(),
            thumbnail_url: None,
            transcript_path: None,
            summary: None,
            status,
            current_step: step.map(Into::into),
            progress: None,
            error_message: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn step_label_matches_case_insensitive_substring() {
        let r = record(
            ProcessingStatus::Processing,
            Some("Transcribing audio..."),
        );
        assert_eq!(progress_stage_index(&r), Some(2));
    }

    #[test]
    fn status_matches_when_no_step_label() {
        let r = record(ProcessingStatus::Queued, None);
        assert_eq!(progress_stage_index(&r), Some(0));

        let r = record(ProcessingStatus::Completed, None);
        assert_eq!(progress_stage_index(&r), Some(5));
    }

    #[test]
    fn unmatched_label_and_status_is_before_all_stages() {
        let r = record(ProcessingStatus::Error, Some("Initializing..."));
        assert_eq!(progress_stage_index(&r), None);
    }

    #[test]
    fn earliest_matching_stage_wins() {
        // A queued record with a step label naming a later stage: the
        // status match on "queued" comes first in the sequence.
        let r = record(ProcessingStatus::Queued, Some("Summarizing..."));
        assert_eq!(progress_stage_index(&r), Some(0));
    }

    #[test]
    fn progress_shows_only_while_in_pipeline() {
        assert!(should_show_progress(&record(ProcessingStatus::Queued, None)));
        assert!(should_show_progress(&record(
            ProcessingStatus::Processing,
            Some("Downloading audio...")
        )));
        assert!(!should_show_progress(&record(
            ProcessingStatus::Completed,
            None
        )));
        assert!(!should_show_progress(&record(ProcessingStatus::Error, None)));
    }
}
