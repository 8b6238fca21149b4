//! Composite score aggregation with content-type dependent weighting.

use tracing::debug;

use crate::domain::{clamp01, FaceQuality, PhotoScore, PhotoType};

/// Utility photos (screenshots, documents) are clamped into this band no
/// matter how clean they are, so they never outrank genuine photos.
const UTILITY_FLOOR: f32 = 0.1;
const UTILITY_CAP: f32 = 0.3;

/// Combines technical, face and contextual sub-scores into one
/// `PhotoScore` under the photo type's weight triple.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Aggregates the three components for a photo of the given type.
    /// Inputs and output are clamped to [0, 1].
    #[must_use]
    pub fn aggregate(
        photo_type: PhotoType,
        technical: f32,
        face: f32,
        context: f32,
    ) -> PhotoScore {
        let technical = clamp01(technical);
        let face = clamp01(face);
        let context = clamp01(context);

        let overall = if photo_type == PhotoType::Utility {
            // Technical + context only, hard-capped.
            ((technical + context) / 2.0).clamp(UTILITY_FLOOR, UTILITY_CAP)
        } else {
            let (w_tech, w_face, w_ctx) = photo_type.weights();
            clamp01(w_tech * technical + w_face * face + w_ctx * context)
        };

        debug!(?photo_type, technical, face, context, overall, "aggregated score");

        PhotoScore::new(technical, face, context, overall)
    }

    /// Photo-level face sub-score: the mean of the faces' composite
    /// ranks, neutral 0.5 when no faces were detected.
    #[must_use]
    pub fn face_component(faces: &[FaceQuality]) -> f32 {
        if faces.is_empty() {
            return 0.5;
        }
        faces.iter().map(|f| f.rank).sum::<f32>() / faces.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_weighting() {
        let score = ScoreAggregator::aggregate(PhotoType::Portrait, 0.8, 0.6, 0.4);
        let expected = 0.4 * 0.8 + 0.4 * 0.6 + 0.2 * 0.4;
        assert!((score.overall - expected).abs() < 1e-6);
    }

    #[test]
    fn group_shots_weight_faces_highest() {
        let strong_faces = ScoreAggregator::aggregate(PhotoType::Group, 0.5, 0.9, 0.5);
        let weak_faces = ScoreAggregator::aggregate(PhotoType::Group, 0.5, 0.2, 0.5);
        assert!(strong_faces.overall > weak_faces.overall);
    }

    #[test]
    fn utility_capped_despite_high_inputs() {
        let score = ScoreAggregator::aggregate(PhotoType::Utility, 0.9, 1.0, 0.9);
        assert!((score.overall - UTILITY_CAP).abs() < f32::EPSILON);
    }

    #[test]
    fn utility_floored_despite_low_inputs() {
        let score = ScoreAggregator::aggregate(PhotoType::Utility, 0.0, 0.0, 0.0);
        assert!((score.overall - UTILITY_FLOOR).abs() < f32::EPSILON);
    }

    #[test]
    fn utility_ignores_face_component() {
        let with_faces = ScoreAggregator::aggregate(PhotoType::Utility, 0.4, 1.0, 0.4);
        let without_faces = ScoreAggregator::aggregate(PhotoType::Utility, 0.4, 0.0, 0.4);
        assert!((with_faces.overall - without_faces.overall).abs() < f32::EPSILON);
    }

    #[test]
    fn inputs_clamped_before_weighting() {
        let score = ScoreAggregator::aggregate(PhotoType::Landscape, 2.0, -1.0, 0.5);
        assert_eq!(score.technical, 1.0);
        assert_eq!(score.face, 0.0);
        assert!((0.0..=1.0).contains(&score.overall));
    }

    #[test]
    fn face_component_neutral_without_faces() {
        assert!((ScoreAggregator::face_component(&[]) - 0.5).abs() < f32::EPSILON);
    }
}
