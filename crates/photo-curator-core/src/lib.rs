//! Photo Curator Core - domain logic for collection curation.
//!
//! This crate groups near-duplicate photos into clusters, scores every
//! photo on technical, facial and contextual quality, curates the best
//! representative per cluster, and plans cross-frame "perfect moment"
//! face replacements. Pixels, detection models, storage and compositing
//! all live behind ports.

pub mod cluster;
pub mod curation;
pub mod domain;
pub mod modules;
pub mod pipeline;
pub mod planner;
pub mod ports;

pub use cluster::{ClusterConfig, ClusterEngine};
pub use curation::{curate, CuratedCluster};
pub use domain::{
    clamp01, BoundingBox, ClusterId, Eligibility, EyeState, FaceAngle, FaceIssue, FaceObservation,
    FaceQuality, FaceRef, Fingerprint, GeoPoint, IneligibleReason, PerfectMomentPlan,
    PersonFaceQualityAnalysis, PersonFaceReplacement, PersonId, Photo, PhotoCluster, PhotoId,
    PhotoMetadata, PhotoScore, PhotoType, Point, SmileQuality,
};
pub use modules::{
    ContextScorer, EarBand, FaceQualityAnalyzer, FaceQualityConfig, ScoreAggregator,
    TechnicalScore, TechnicalScorer, TechnicalSignals,
};
pub use pipeline::{ClusterReport, CurationPipeline, CurationReport, PhotoInput, PipelineConfig};
pub use planner::{PerfectMomentPlanner, PlannerConfig};
pub use ports::{
    CollectionSource, CompositeError, CompositeHandle, Compositor, NullProgressSink,
    PersonMatcher, ProgressEvent, ProgressSink,
};
