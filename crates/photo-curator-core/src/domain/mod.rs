//! Core domain types for photo curation.

mod cluster;
mod face;
mod photo;
mod plan;
mod score;

pub use cluster::{ClusterId, PhotoCluster};
pub use face::{
    BoundingBox, EyeState, FaceAngle, FaceIssue, FaceObservation, FaceQuality, Point, SmileQuality,
};
pub use photo::{Fingerprint, GeoPoint, Photo, PhotoId, PhotoMetadata};
pub use plan::{
    Eligibility, FaceRef, IneligibleReason, PerfectMomentPlan, PersonFaceQualityAnalysis,
    PersonFaceReplacement, PersonId,
};
pub use score::{PhotoScore, PhotoType};

/// Clamps a component scalar into [0, 1]. Every constructed score type
/// passes through here; out-of-range inputs are an upstream defect we
/// absorb rather than propagate.
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
