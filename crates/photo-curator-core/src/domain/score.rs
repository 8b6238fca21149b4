//! Photo-level quality scores and content-type weighting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clamp01;

/// Detected content type of a photo, supplied by upstream classification.
/// Drives the weighting of technical/face/context components.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    Portrait,
    Group,
    Event,
    Landscape,
    GoldenHour,
    CloseUp,
    Action,
    LowLight,
    Indoor,
    /// Screenshots, documents, receipts. Scored by technical + context
    /// only and hard-capped so they never outrank genuine photos.
    Utility,
}

impl PhotoType {
    /// Weight triple (technical, face, context). Sums to 1.0 for every
    /// non-utility type; utility scoring bypasses the triple entirely.
    #[must_use]
    pub const fn weights(self) -> (f32, f32, f32) {
        match self {
            Self::Portrait => (0.4, 0.4, 0.2),
            Self::Group => (0.3, 0.5, 0.2),
            Self::Event => (0.25, 0.45, 0.3),
            Self::Landscape => (0.5, 0.1, 0.4),
            Self::GoldenHour => (0.4, 0.1, 0.5),
            Self::CloseUp => (0.6, 0.1, 0.3),
            Self::Action => (0.3, 0.2, 0.5),
            Self::LowLight => (0.7, 0.1, 0.2),
            Self::Indoor => (0.45, 0.35, 0.2),
            Self::Utility => (0.5, 0.0, 0.5),
        }
    }
}

/// Composite quality score for one photo.
///
/// Recomputed whole whenever a component input changes; attached to a
/// photo by value, never patched field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoScore {
    /// Technical component (0-1).
    pub technical: f32,
    /// Face component (0-1).
    pub face: f32,
    /// Contextual component (0-1).
    pub context: f32,
    /// Weighted overall score (0-1).
    pub overall: f32,
    /// When the score was computed.
    pub computed_at: DateTime<Utc>,
}

impl PhotoScore {
    /// Builds a score record, clamping every component into [0, 1].
    #[must_use]
    pub fn new(technical: f32, face: f32, context: f32, overall: f32) -> Self {
        Self {
            technical: clamp01(technical),
            face: clamp01(face),
            context: clamp01(context),
            overall: clamp01(overall),
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_triples_sum_to_one() {
        let types = [
            PhotoType::Portrait,
            PhotoType::Group,
            PhotoType::Event,
            PhotoType::Landscape,
            PhotoType::GoldenHour,
            PhotoType::CloseUp,
            PhotoType::Action,
            PhotoType::LowLight,
            PhotoType::Indoor,
        ];
        for t in types {
            let (tech, face, ctx) = t.weights();
            assert!(
                ((tech + face + ctx) - 1.0).abs() < 1e-6,
                "{t:?} weights do not sum to 1.0"
            );
        }
    }

    #[test]
    fn score_components_are_clamped() {
        let score = PhotoScore::new(-0.1, 1.2, 0.5, 3.0);
        assert_eq!(score.technical, 0.0);
        assert_eq!(score.face, 1.0);
        assert_eq!(score.context, 0.5);
        assert_eq!(score.overall, 1.0);
    }
}
