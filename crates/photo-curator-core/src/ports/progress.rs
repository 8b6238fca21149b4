//! Progress reporting port for UI integration.

use crate::domain::PhotoId;

/// Events emitted while the pipeline runs, for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scoring started for a photo.
    Started {
        /// Asset reference of the photo.
        asset_ref: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total photos in the batch, if known.
        total: Option<usize>,
    },
    /// Scoring completed for a photo.
    Scored {
        /// The scored photo.
        photo: PhotoId,
        /// Its overall score.
        overall: f32,
        /// Number of faces carrying issues.
        issues: usize,
    },
    /// A photo was skipped due to an error.
    Skipped {
        /// Asset reference of the photo.
        asset_ref: String,
        /// Reason for skipping.
        reason: String,
    },
    /// Clustering and curation finished.
    Finished {
        /// Photos scored successfully.
        scored: usize,
        /// Photos skipped.
        skipped: usize,
        /// Clusters produced.
        clusters: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Sink that discards all events.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_event(&self, _event: ProgressEvent) {}
}
