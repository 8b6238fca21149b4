//! Perfect-moment eligibility analysis and face-replacement planning.
//!
//! Per cluster: decide whether a cross-frame face replacement is
//! worthwhile, and if so emit one replacement per improvable person,
//! pairing that person's best face across frames with their face in the
//! cluster's representative photo.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::curation::CuratedCluster;
use crate::domain::{
    clamp01, FaceRef, IneligibleReason, PerfectMomentPlan, PersonFaceQualityAnalysis,
    PersonFaceReplacement, PersonId, Photo, PhotoCluster,
};
use crate::ports::PersonMatcher;

/// Planner thresholds. All tunable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Minimum photos for a cluster to qualify.
    pub min_photos: usize,
    /// Improvement potential a person must exceed to be a candidate.
    pub potential_floor: f32,
    /// Best-minus-worst rank spread a person must exceed.
    pub spread_floor: f32,
    /// Capture quality below which a face is unusable for analysis.
    pub usability_floor: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_photos: 2,
            potential_floor: 0.4,
            spread_floor: 0.2,
            usability_floor: 0.2,
        }
    }
}

/// Perfect-moment planner.
pub struct PerfectMomentPlanner {
    config: PlannerConfig,
}

impl PerfectMomentPlanner {
    /// Creates a planner with the given thresholds.
    #[must_use]
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Evaluates one curated cluster and plans its replacements.
    ///
    /// Failures of the identity collaborator become an
    /// `Ineligible(ProcessingError)` plan; nothing here aborts the
    /// batch.
    #[must_use]
    pub fn evaluate(
        &self,
        cluster: &PhotoCluster,
        curated: &CuratedCluster,
        photos: &[Photo],
        matcher: &dyn PersonMatcher,
    ) -> PerfectMomentPlan {
        let members: Vec<&Photo> = cluster
            .photos
            .iter()
            .filter_map(|id| photos.iter().find(|p| p.id == *id))
            .collect();

        if members.len() < self.config.min_photos {
            return PerfectMomentPlan::ineligible(cluster.id, IneligibleReason::InsufficientPhotos);
        }

        let unusable = members.iter().any(|photo| {
            photo
                .faces
                .iter()
                .any(|face| face.capture_quality < self.config.usability_floor)
        });
        if unusable {
            return PerfectMomentPlan::ineligible(cluster.id, IneligibleReason::LowQualityPhotos);
        }

        match matcher.same_people(&members) {
            Ok(true) => {}
            Ok(false) => {
                return PerfectMomentPlan::ineligible(
                    cluster.id,
                    IneligibleReason::InconsistentPeople,
                );
            }
            Err(e) => {
                warn!(cluster = %cluster.id, error = %e, "person matcher failed");
                return PerfectMomentPlan::ineligible(cluster.id, IneligibleReason::ProcessingError);
            }
        }

        let analyses = match self.analyze_people(&members, matcher) {
            Ok(analyses) => analyses,
            Err(e) => {
                warn!(cluster = %cluster.id, error = %e, "person matcher failed");
                return PerfectMomentPlan::ineligible(cluster.id, IneligibleReason::ProcessingError);
            }
        };

        // A genuine quality spread somewhere, not identical faces.
        if !analyses
            .iter()
            .any(|a| a.improvement_potential > f32::EPSILON)
        {
            return PerfectMomentPlan::ineligible(cluster.id, IneligibleReason::NoFaceVariations);
        }

        let candidates: Vec<&PersonFaceQualityAnalysis> = analyses
            .iter()
            .filter(|a| {
                a.improvement_potential > self.config.potential_floor
                    && (a.best_rank() - a.worst_rank()) > self.config.spread_floor
            })
            .collect();

        let replacements = self.plan_replacements(&candidates, curated, photos, matcher);

        let improvement_potential = if candidates.is_empty() {
            0.0
        } else {
            candidates
                .iter()
                .map(|a| a.improvement_potential)
                .sum::<f32>()
                / candidates.len() as f32
        };

        let estimated_processing = processing_estimate(analyses.len(), candidates.len());

        debug!(
            cluster = %cluster.id,
            people = analyses.len(),
            candidates = candidates.len(),
            replacements = replacements.len(),
            "planned perfect moment"
        );

        PerfectMomentPlan {
            cluster: cluster.id,
            eligibility: crate::domain::Eligibility::Eligible,
            analyses,
            replacements,
            improvement_potential,
            estimated_processing,
        }
    }

    /// Groups face observations by person across the cluster's members.
    fn analyze_people(
        &self,
        members: &[&Photo],
        matcher: &dyn PersonMatcher,
    ) -> anyhow::Result<Vec<PersonFaceQualityAnalysis>> {
        let mut by_person: BTreeMap<PersonId, Vec<(FaceRef, crate::domain::FaceQuality)>> =
            BTreeMap::new();

        for photo in members {
            let assignments = matcher.identify(photo)?;
            for (face_index, person) in assignments.into_iter().enumerate() {
                let (Some(person), Some(quality)) = (person, photo.faces.get(face_index)) else {
                    continue;
                };
                by_person.entry(person).or_default().push((
                    FaceRef {
                        photo: photo.id,
                        face: face_index,
                    },
                    quality.clone(),
                ));
            }
        }

        Ok(by_person
            .into_iter()
            .filter_map(|(person, observations)| {
                PersonFaceQualityAnalysis::from_observations(person, observations)
            })
            .collect())
    }

    /// Emits one replacement per candidate whose face appears in the
    /// representative photo with something visibly wrong.
    fn plan_replacements(
        &self,
        candidates: &[&PersonFaceQualityAnalysis],
        curated: &CuratedCluster,
        photos: &[Photo],
        matcher: &dyn PersonMatcher,
    ) -> Vec<PersonFaceReplacement> {
        let Some(representative) = photos.iter().find(|p| p.id == curated.representative) else {
            return Vec::new();
        };
        let assignments = match matcher.identify(representative) {
            Ok(assignments) => assignments,
            Err(e) => {
                warn!(error = %e, "person matcher failed on representative");
                return Vec::new();
            }
        };

        let mut replacements = Vec::new();
        for analysis in candidates {
            // Destination is this person's face in the representative
            // photo specifically; the goal is to fix the chosen base
            // photo, not an arbitrary frame.
            let Some(face_index) = assignments
                .iter()
                .position(|p| p.as_ref() == Some(&analysis.person))
            else {
                debug!(person = %analysis.person, "not in representative, skipping");
                continue;
            };
            let destination = FaceRef {
                photo: representative.id,
                face: face_index,
            };
            let Some(destination_quality) = representative.faces.get(face_index).cloned() else {
                continue;
            };
            // Nothing visibly wrong with the destination face means
            // nothing to fix.
            let Some(improvement) = destination_quality.primary_issue() else {
                debug!(person = %analysis.person, "representative face issue-free, skipping");
                continue;
            };

            let source = analysis.best;
            if source == destination {
                continue;
            }
            let Some(source_quality) = analysis.quality_of(source).cloned() else {
                continue;
            };

            let confidence = replacement_confidence(&source_quality);
            replacements.push(PersonFaceReplacement::plan(
                analysis.person.clone(),
                source,
                source_quality,
                destination,
                destination_quality,
                improvement,
                confidence,
            ));
        }
        replacements
    }
}

impl Default for PerfectMomentPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

/// Confidence that the source face is good material for compositing:
/// bounded by its capture quality and the analyzer's confidence in its
/// eye and smile calls.
fn replacement_confidence(source: &crate::domain::FaceQuality) -> f32 {
    clamp01(
        source
            .capture_quality
            .min(source.eyes.confidence)
            .min(source.smile.confidence),
    )
}

/// Scheduling hint for UI purposes only, not a correctness contract.
fn processing_estimate(person_count: usize, candidate_count: usize) -> Duration {
    Duration::from_secs(5 + 2 * person_count as u64 + 3 * candidate_count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation;
    use crate::domain::{
        BoundingBox, Eligibility, EyeState, FaceAngle, FaceIssue, FaceQuality, PhotoScore,
        SmileQuality,
    };
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    /// Matcher backed by a fixed per-photo assignment table.
    struct TableMatcher {
        table: HashMap<crate::domain::PhotoId, Vec<Option<PersonId>>>,
        fail: bool,
    }

    impl TableMatcher {
        fn new() -> Self {
            Self {
                table: HashMap::new(),
                fail: false,
            }
        }

        fn assign(&mut self, photo: &Photo, people: &[&str]) {
            self.table.insert(
                photo.id,
                people.iter().map(|p| Some(PersonId::new(*p))).collect(),
            );
        }
    }

    impl PersonMatcher for TableMatcher {
        fn identify(&self, photo: &Photo) -> anyhow::Result<Vec<Option<PersonId>>> {
            if self.fail {
                anyhow::bail!("identity backend unavailable");
            }
            Ok(self.table.get(&photo.id).cloned().unwrap_or_default())
        }
    }

    fn face(rank: f32, eyes_open: bool) -> FaceQuality {
        let mut issues = Vec::new();
        if !eyes_open {
            issues.push(FaceIssue::EyesClosed);
        }
        FaceQuality {
            bbox: BoundingBox::new(0.1, 0.1, 0.2, 0.2),
            capture_quality: 0.9,
            eyes: EyeState::new(eyes_open, eyes_open, 0.9),
            smile: SmileQuality::new(0.6, 0.8, 0.9),
            angle: FaceAngle::default(),
            sharpness: 0.8,
            rank,
            issues,
        }
    }

    fn photo(secs: i64, overall: f32, faces: Vec<FaceQuality>) -> Photo {
        Photo::new(
            format!("asset://{secs}"),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
        .with_faces(faces)
        .with_score(PhotoScore::new(0.5, 0.5, 0.5, overall))
    }

    fn setup(photos: &[Photo]) -> (PhotoCluster, CuratedCluster) {
        let mut cluster = PhotoCluster::seeded_with(&photos[0]);
        for p in &photos[1..] {
            cluster.add(p);
        }
        let curated = curation::curate(&cluster, photos).unwrap();
        (cluster, curated)
    }

    #[test]
    fn singleton_cluster_is_never_eligible() {
        let photos = vec![photo(0, 0.8, vec![face(0.8, true)])];
        let (cluster, curated) = setup(&photos);
        let matcher = TableMatcher::new();

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::InsufficientPhotos)
        );
    }

    #[test]
    fn eyes_closed_scenario_emits_feasible_replacement() {
        // Photo A: eyes closed, rank 0.3. Photo B: eyes open, rank 0.8.
        // B ranks higher overall, so B is the representative and the
        // planner fixes B's... nothing; A's face would be fixed only if
        // A were the base. Arrange scores so A is the representative.
        let photos = vec![
            photo(0, 0.9, vec![face(0.3, false)]),
            photo(1, 0.5, vec![face(0.8, true)]),
        ];
        let (cluster, curated) = setup(&photos);
        assert_eq!(curated.representative, photos[0].id);

        let mut matcher = TableMatcher::new();
        matcher.assign(&photos[0], &["alice"]);
        matcher.assign(&photos[1], &["alice"]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);

        assert_eq!(plan.eligibility, Eligibility::Eligible);
        assert_eq!(plan.replacements.len(), 1);

        let replacement = &plan.replacements[0];
        assert_eq!(replacement.improvement, FaceIssue::EyesClosed);
        assert!(replacement.is_feasible);
        assert!((replacement.expected_improvement - 0.5).abs() < 1e-6);
        assert_eq!(replacement.source.photo, photos[1].id);
        assert_eq!(replacement.destination.photo, photos[0].id);
        assert!((plan.improvement_potential - 0.5).abs() < 1e-6);
    }

    #[test]
    fn disjoint_people_are_inconsistent() {
        let photos = vec![
            photo(0, 0.8, vec![face(0.8, true)]),
            photo(1, 0.7, vec![face(0.7, true)]),
            photo(2, 0.6, vec![face(0.6, true)]),
        ];
        let (cluster, curated) = setup(&photos);

        let mut matcher = TableMatcher::new();
        matcher.assign(&photos[0], &["alice"]);
        matcher.assign(&photos[1], &["bob"]);
        matcher.assign(&photos[2], &["carol"]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::InconsistentPeople)
        );
    }

    #[test]
    fn missing_identity_map_is_inconsistent() {
        let photos = vec![
            photo(0, 0.8, vec![face(0.8, true)]),
            photo(1, 0.7, vec![face(0.7, true)]),
        ];
        let (cluster, curated) = setup(&photos);
        // Matcher with no assignments: every photo identifies to an
        // empty list, faces go unmatched.
        let mut matcher = TableMatcher::new();
        matcher.table.insert(photos[0].id, vec![None]);
        matcher.table.insert(photos[1].id, vec![None]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::InconsistentPeople)
        );
    }

    #[test]
    fn matcher_failure_is_processing_error() {
        let photos = vec![
            photo(0, 0.8, vec![face(0.8, true)]),
            photo(1, 0.7, vec![face(0.7, true)]),
        ];
        let (cluster, curated) = setup(&photos);
        let mut matcher = TableMatcher::new();
        matcher.fail = true;

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::ProcessingError)
        );
    }

    #[test]
    fn identical_faces_have_no_variations() {
        let photos = vec![
            photo(0, 0.8, vec![face(0.8, true)]),
            photo(1, 0.7, vec![face(0.8, true)]),
        ];
        let (cluster, curated) = setup(&photos);

        let mut matcher = TableMatcher::new();
        matcher.assign(&photos[0], &["alice"]);
        matcher.assign(&photos[1], &["alice"]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::NoFaceVariations)
        );
    }

    #[test]
    fn unusable_faces_make_cluster_low_quality() {
        let mut bad_face = face(0.1, true);
        bad_face.capture_quality = 0.05;
        let photos = vec![
            photo(0, 0.8, vec![face(0.8, true)]),
            photo(1, 0.7, vec![bad_face]),
        ];
        let (cluster, curated) = setup(&photos);

        let mut matcher = TableMatcher::new();
        matcher.assign(&photos[0], &["alice"]);
        matcher.assign(&photos[1], &["alice"]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(
            plan.eligibility,
            Eligibility::Ineligible(IneligibleReason::LowQualityPhotos)
        );
    }

    #[test]
    fn small_spread_is_eligible_but_yields_no_candidates() {
        let photos = vec![
            photo(0, 0.8, vec![face(0.75, true)]),
            photo(1, 0.7, vec![face(0.8, true)]),
        ];
        let (cluster, curated) = setup(&photos);

        let mut matcher = TableMatcher::new();
        matcher.assign(&photos[0], &["alice"]);
        matcher.assign(&photos[1], &["alice"]);

        let plan = PerfectMomentPlanner::default().evaluate(&cluster, &curated, &photos, &matcher);
        assert_eq!(plan.eligibility, Eligibility::Eligible);
        assert!(plan.replacements.is_empty());
        assert!(plan.improvement_potential.abs() < f32::EPSILON);
    }

    #[test]
    fn processing_estimate_formula() {
        assert_eq!(processing_estimate(0, 0), Duration::from_secs(5));
        assert_eq!(processing_estimate(3, 2), Duration::from_secs(17));
    }
}
