//! Contextual scoring.
//!
//! The contextual signal (time-of-day desirability, location uniqueness,
//! event significance) is computed upstream; this scorer only resolves
//! absence to neutral and clamps.

use crate::domain::clamp01;

/// Contextual scorer.
pub struct ContextScorer;

impl ContextScorer {
    const NEUTRAL: f32 = 0.5;

    /// Resolves the external contextual signal into a [0, 1] score.
    #[must_use]
    pub fn score(signal: Option<f32>) -> f32 {
        clamp01(signal.unwrap_or(Self::NEUTRAL))
    }
}
