//! Pipeline orchestration: parallel scoring, sequential clustering,
//! parallel per-cluster curation and planning.
//!
//! Scoring is embarrassingly parallel across photos; each worker sees
//! only its own photo's external inputs and hands the scored photo back
//! by value. Clustering needs the whole ordered batch and runs single
//! threaded afterwards; it is cheap relative to scoring.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::{ClusterConfig, ClusterEngine};
use crate::curation::{self, CuratedCluster};
use crate::domain::{
    Eligibility, FaceObservation, PerfectMomentPlan, Photo, PhotoCluster, PhotoType,
};
use crate::modules::{
    ContextScorer, FaceQualityAnalyzer, FaceQualityConfig, ScoreAggregator, TechnicalScorer,
    TechnicalSignals,
};
use crate::planner::{PerfectMomentPlanner, PlannerConfig};
use crate::ports::{PersonMatcher, ProgressEvent, ProgressSink};

/// One photo plus every external signal the pipeline consumes for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoInput {
    /// The unscored photo record.
    pub photo: Photo,
    /// Upstream content-type classification.
    pub photo_type: PhotoType,
    /// Image-level technical signals.
    #[serde(default)]
    pub technical: TechnicalSignals,
    /// Contextual desirability signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<f32>,
    /// Detected faces with landmarks.
    #[serde(default)]
    pub observations: Vec<FaceObservation>,
}

/// Everything produced for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// The cluster itself.
    pub cluster: PhotoCluster,
    /// Curated ordering and representative.
    pub curated: CuratedCluster,
    /// Perfect-moment verdict.
    pub plan: PerfectMomentPlan,
}

/// Output of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationReport {
    /// All scored photos, cluster membership attached.
    pub photos: Vec<Photo>,
    /// Per-cluster curation and planning results.
    pub clusters: Vec<ClusterReport>,
    /// Whether the run was cancelled before completing.
    pub cancelled: bool,
}

impl CurationReport {
    fn cancelled() -> Self {
        Self {
            photos: Vec::new(),
            clusters: Vec::new(),
            cancelled: true,
        }
    }
}

/// Pipeline configuration, aggregating every stage's tunables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Face quality analysis tunables.
    pub face: FaceQualityConfig,
    /// Clustering tunables.
    pub cluster: ClusterConfig,
    /// Planner tunables.
    pub planner: PlannerConfig,
}

/// The full curation pipeline.
pub struct CurationPipeline {
    analyzer: FaceQualityAnalyzer,
    engine: ClusterEngine,
    planner: PerfectMomentPlanner,
}

impl CurationPipeline {
    /// Builds a pipeline from configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            analyzer: FaceQualityAnalyzer::new(config.face),
            engine: ClusterEngine::new(config.cluster),
            planner: PerfectMomentPlanner::new(config.planner),
        }
    }

    /// Runs the pipeline over a materialized collection.
    ///
    /// `matcher` is only needed for perfect-moment planning; pass
    /// `None` and planning is skipped entirely, leaving every plan
    /// `NotEvaluated`. Emits per-photo `Started` and `Scored` events;
    /// the batch-level `Finished` summary belongs to the caller, which
    /// also knows about records dropped before the run.
    ///
    /// Cancellation is cooperative: setting `cancel` discards
    /// partially completed work, nothing partial is reported.
    #[must_use]
    pub fn run(
        &self,
        inputs: Vec<PhotoInput>,
        matcher: Option<&dyn PersonMatcher>,
        progress: &dyn ProgressSink,
        cancel: &AtomicBool,
    ) -> CurationReport {
        let total = inputs.len();
        info!(photos = total, "pipeline started");

        // Stage 1: per-photo scoring, parallel across photos.
        let mut photos: Vec<Photo> = inputs
            .into_par_iter()
            .enumerate()
            .filter_map(|(index, input)| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                progress.on_event(ProgressEvent::Started {
                    asset_ref: input.photo.asset_ref.clone(),
                    index,
                    total: Some(total),
                });
                let photo = self.score_photo(input);
                progress.on_event(ProgressEvent::Scored {
                    photo: photo.id,
                    overall: photo.overall(),
                    issues: photo
                        .faces
                        .iter()
                        .filter(|f| !f.is_issue_free())
                        .count(),
                });
                Some(photo)
            })
            .collect();

        if cancel.load(Ordering::Relaxed) {
            info!("pipeline cancelled during scoring");
            return CurationReport::cancelled();
        }

        // Stage 2: clustering, sequential over the ordered batch.
        let clusters = self.engine.cluster(&photos);
        for cluster in &clusters {
            for photo_id in &cluster.photos {
                if let Some(photo) = photos.iter_mut().find(|p| p.id == *photo_id) {
                    photo.cluster = Some(cluster.id);
                }
            }
        }

        // Stage 3: curation and planning, parallel across clusters.
        let reports: Vec<ClusterReport> = clusters
            .into_par_iter()
            .filter_map(|cluster| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let curated = curation::curate(&cluster, &photos)?;
                let plan = match matcher {
                    Some(matcher) => self.planner.evaluate(&cluster, &curated, &photos, matcher),
                    None => PerfectMomentPlan {
                        cluster: cluster.id,
                        eligibility: Eligibility::NotEvaluated,
                        analyses: Vec::new(),
                        replacements: Vec::new(),
                        improvement_potential: 0.0,
                        estimated_processing: std::time::Duration::ZERO,
                    },
                };
                Some(ClusterReport {
                    cluster,
                    curated,
                    plan,
                })
            })
            .collect();

        if cancel.load(Ordering::Relaxed) {
            info!("pipeline cancelled during curation");
            return CurationReport::cancelled();
        }

        info!(clusters = reports.len(), "pipeline finished");

        CurationReport {
            photos,
            clusters: reports,
            cancelled: false,
        }
    }

    /// Scores one photo from its external signals. Pure per-photo work;
    /// the score is attached atomically by value.
    fn score_photo(&self, input: PhotoInput) -> Photo {
        let faces: Vec<_> = input
            .observations
            .iter()
            .map(|obs| self.analyzer.analyze(obs))
            .collect();

        let technical = TechnicalScorer::score(&input.technical);
        let context = ContextScorer::score(input.context);
        let face_component = ScoreAggregator::face_component(&faces);
        let score = ScoreAggregator::aggregate(
            input.photo_type,
            technical.overall,
            face_component,
            context,
        );

        debug!(
            asset_ref = %input.photo.asset_ref,
            overall = score.overall,
            faces = faces.len(),
            "scored photo"
        );

        input.photo.with_faces(faces).with_score(score)
    }
}

impl Default for CurationPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fingerprint, PersonId};
    use crate::ports::NullProgressSink;
    use chrono::{TimeZone, Utc};

    struct NoPeople;

    impl PersonMatcher for NoPeople {
        fn identify(&self, photo: &Photo) -> anyhow::Result<Vec<Option<PersonId>>> {
            Ok(vec![None; photo.faces.len()])
        }
    }

    fn input(secs: i64, photo_type: PhotoType) -> PhotoInput {
        let mut photo = Photo::new(
            format!("asset://{secs}"),
            Utc.timestamp_opt(secs, 0).unwrap(),
        );
        photo.fingerprint = Some(Fingerprint::Hash(vec![0x00; 8]));
        PhotoInput {
            photo,
            photo_type,
            technical: TechnicalSignals {
                sharpness: Some(0.8),
                exposure: Some(0.8),
                composition: Some(0.8),
            },
            context: Some(0.6),
            observations: Vec::new(),
        }
    }

    #[test]
    fn run_scores_and_clusters_everything() {
        let pipeline = CurationPipeline::default();
        let inputs = vec![
            input(0, PhotoType::Landscape),
            input(2, PhotoType::Landscape),
            input(1000, PhotoType::Landscape),
        ];

        let report = pipeline.run(inputs, None, &NullProgressSink, &AtomicBool::new(false));

        assert!(!report.cancelled);
        assert_eq!(report.photos.len(), 3);
        assert_eq!(report.clusters.len(), 2);
        assert!(report.photos.iter().all(|p| p.score.is_some()));
        assert!(report.photos.iter().all(|p| p.cluster.is_some()));
    }

    #[test]
    fn plans_are_not_evaluated_without_matcher() {
        let pipeline = CurationPipeline::default();
        let report = pipeline.run(
            vec![input(0, PhotoType::Portrait)],
            None,
            &NullProgressSink,
            &AtomicBool::new(false),
        );

        assert_eq!(
            report.clusters[0].plan.eligibility,
            Eligibility::NotEvaluated
        );
    }

    #[test]
    fn matcher_without_identities_marks_clusters_ineligible() {
        let pipeline = CurationPipeline::default();
        let inputs = vec![input(0, PhotoType::Portrait), input(1, PhotoType::Portrait)];

        let report = pipeline.run(
            inputs,
            Some(&NoPeople),
            &NullProgressSink,
            &AtomicBool::new(false),
        );

        // No faces at all: same-people trivially holds, but there are
        // no analyses and therefore no variations.
        assert!(matches!(
            report.clusters[0].plan.eligibility,
            Eligibility::Ineligible(_)
        ));
    }

    #[test]
    fn cancellation_discards_partial_work() {
        let pipeline = CurationPipeline::default();
        let report = pipeline.run(
            vec![input(0, PhotoType::Portrait)],
            None,
            &NullProgressSink,
            &AtomicBool::new(true),
        );

        assert!(report.cancelled);
        assert!(report.photos.is_empty());
        assert!(report.clusters.is_empty());
    }

    #[test]
    fn utility_photos_never_outrank_real_ones() {
        let pipeline = CurationPipeline::default();
        let mut screenshot = input(0, PhotoType::Utility);
        screenshot.technical.sharpness = Some(1.0);
        screenshot.technical.exposure = Some(1.0);
        screenshot.technical.composition = Some(1.0);
        screenshot.context = Some(1.0);
        let landscape = input(1, PhotoType::Landscape);

        let report = pipeline.run(
            vec![screenshot, landscape],
            None,
            &NullProgressSink,
            &AtomicBool::new(false),
        );

        let overall_of = |asset: &str| {
            report
                .photos
                .iter()
                .find(|p| p.asset_ref == asset)
                .unwrap()
                .overall()
        };
        assert!(overall_of("asset://0") <= 0.3);
        assert!(overall_of("asset://1") > overall_of("asset://0"));
    }
}
