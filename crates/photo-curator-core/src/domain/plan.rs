//! Perfect-moment planning records: eligibility, per-person analyses
//! and planned face replacements.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{clamp01, ClusterId, FaceIssue, FaceQuality, PhotoId};

/// Stable person identity within a cluster, assigned by the external
/// person-matching collaborator. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to one detected face: photo id plus the face's index within
/// that photo's detection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRef {
    /// Photo containing the face.
    pub photo: PhotoId,
    /// Index into the photo's `faces` list.
    pub face: usize,
}

/// All observations of one person across a cluster, with the best and
/// worst face by composite rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFaceQualityAnalysis {
    /// The person these observations belong to.
    pub person: PersonId,
    /// Every observation of this person in the cluster.
    pub observations: Vec<(FaceRef, FaceQuality)>,
    /// Reference to the highest-ranked face.
    pub best: FaceRef,
    /// Reference to the lowest-ranked face.
    pub worst: FaceRef,
    /// How much a replacement could improve this person (0-1).
    pub improvement_potential: f32,
}

impl PersonFaceQualityAnalysis {
    /// Builds the analysis from one person's observations. Returns
    /// `None` for an empty observation list.
    #[must_use]
    pub fn from_observations(
        person: PersonId,
        observations: Vec<(FaceRef, FaceQuality)>,
    ) -> Option<Self> {
        let best = observations
            .iter()
            .max_by(|a, b| a.1.rank.total_cmp(&b.1.rank))?;
        let worst = observations
            .iter()
            .min_by(|a, b| a.1.rank.total_cmp(&b.1.rank))?;

        let improvement_potential = clamp01(best.1.rank - worst.1.rank);
        let (best, worst) = (best.0, worst.0);

        Some(Self {
            person,
            observations,
            best,
            worst,
            improvement_potential,
        })
    }

    /// Quality record for a face reference, if it belongs to this
    /// analysis.
    #[must_use]
    pub fn quality_of(&self, face: FaceRef) -> Option<&FaceQuality> {
        self.observations
            .iter()
            .find(|(r, _)| *r == face)
            .map(|(_, q)| q)
    }

    /// Rank of the best observation.
    #[must_use]
    pub fn best_rank(&self) -> f32 {
        self.quality_of(self.best).map_or(0.0, |q| q.rank)
    }

    /// Rank of the worst observation.
    #[must_use]
    pub fn worst_rank(&self) -> f32 {
        self.quality_of(self.worst).map_or(0.0, |q| q.rank)
    }
}

/// Why a cluster does not qualify for perfect-moment planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    /// Fewer than two photos.
    InsufficientPhotos,
    /// No person shows a real quality spread across frames.
    NoFaceVariations,
    /// Frames do not depict the same set of people, or no identity
    /// mapping was available.
    InconsistentPeople,
    /// Detected faces fall below the usability floor.
    LowQualityPhotos,
    /// The person-matching collaborator failed.
    ProcessingError,
}

impl IneligibleReason {
    /// Fixed user-facing explanation.
    #[must_use]
    pub const fn explanation(self) -> &'static str {
        match self {
            Self::InsufficientPhotos => {
                "At least two photos of the same moment are needed to build a perfect moment."
            }
            Self::NoFaceVariations => {
                "Everyone already looks their best in these photos; there is nothing to improve."
            }
            Self::InconsistentPeople => {
                "These photos do not show the same group of people, so faces cannot be swapped between them."
            }
            Self::LowQualityPhotos => {
                "The faces in these photos are too low quality to analyze reliably."
            }
            Self::ProcessingError => "Something went wrong while analyzing these photos.",
        }
    }
}

/// Perfect-moment eligibility state of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum Eligibility {
    /// The planner has not looked at this cluster yet.
    NotEvaluated,
    /// The cluster qualifies for replacement planning.
    Eligible,
    /// The cluster does not qualify.
    Ineligible(IneligibleReason),
}

/// One planned cross-frame face substitution. Immutable once built;
/// plans are recomputed, not patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFaceReplacement {
    /// Whose face is being fixed.
    pub person: PersonId,
    /// Best-quality face, taken from another frame.
    pub source: FaceRef,
    /// Quality of the source face.
    pub source_quality: FaceQuality,
    /// Face being replaced, in the destination photo.
    pub destination: FaceRef,
    /// Quality of the destination face.
    pub destination_quality: FaceQuality,
    /// What the replacement fixes.
    pub improvement: FaceIssue,
    /// Confidence in the substitution (0-1).
    pub confidence: f32,
    /// Rank delta the substitution is expected to deliver.
    pub expected_improvement: f32,
    /// Whether the compositor can be expected to succeed.
    pub is_feasible: bool,
}

impl PersonFaceReplacement {
    /// Builds a replacement and derives feasibility: the pose must be
    /// alignment-compatible, confidence above 0.5, and the source must
    /// strictly outrank the destination.
    #[must_use]
    pub fn plan(
        person: PersonId,
        source: FaceRef,
        source_quality: FaceQuality,
        destination: FaceRef,
        destination_quality: FaceQuality,
        improvement: FaceIssue,
        confidence: f32,
    ) -> Self {
        let confidence = clamp01(confidence);
        let expected_improvement = source_quality.rank - destination_quality.rank;
        let is_feasible = source_quality
            .angle
            .is_alignment_compatible(&destination_quality.angle)
            && confidence > 0.5
            && source_quality.rank > destination_quality.rank;

        Self {
            person,
            source,
            source_quality,
            destination,
            destination_quality,
            improvement,
            confidence,
            expected_improvement,
            is_feasible,
        }
    }
}

/// The planner's verdict for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfectMomentPlan {
    /// Cluster the plan applies to.
    pub cluster: ClusterId,
    /// Eligibility outcome.
    pub eligibility: Eligibility,
    /// Per-person analyses, built for eligible clusters.
    pub analyses: Vec<PersonFaceQualityAnalysis>,
    /// Planned replacements, one per improvable person.
    pub replacements: Vec<PersonFaceReplacement>,
    /// Mean improvement potential across candidates, 0 if none.
    pub improvement_potential: f32,
    /// Scheduling hint for UI purposes only.
    pub estimated_processing: Duration,
}

impl PerfectMomentPlan {
    /// An ineligible plan with no replacements.
    #[must_use]
    pub fn ineligible(cluster: ClusterId, reason: IneligibleReason) -> Self {
        Self {
            cluster,
            eligibility: Eligibility::Ineligible(reason),
            analyses: Vec::new(),
            replacements: Vec::new(),
            improvement_potential: 0.0,
            estimated_processing: Duration::ZERO,
        }
    }
}
