//! Technical quality scoring from externally computed image signals.

use serde::{Deserialize, Serialize};

use crate::domain::clamp01;

/// Image-level signals delivered by external image analysis. Absent
/// signals resolve to a neutral 0.5, never to an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignals {
    /// Image sharpness (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f32>,
    /// Exposure quality (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<f32>,
    /// Composition quality (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<f32>,
}

/// Technical score with its resolved sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalScore {
    pub sharpness: f32,
    pub exposure: f32,
    pub composition: f32,
    /// Unweighted mean of the three sub-scores.
    pub overall: f32,
}

/// Technical quality scorer. Consumes external signals only; this crate
/// never decodes pixels.
pub struct TechnicalScorer;

impl TechnicalScorer {
    const NEUTRAL: f32 = 0.5;

    /// Scores one photo's technical signals.
    #[must_use]
    pub fn score(signals: &TechnicalSignals) -> TechnicalScore {
        let sharpness = clamp01(signals.sharpness.unwrap_or(Self::NEUTRAL));
        let exposure = clamp01(signals.exposure.unwrap_or(Self::NEUTRAL));
        let composition = clamp01(signals.composition.unwrap_or(Self::NEUTRAL));

        TechnicalScore {
            sharpness,
            exposure,
            composition,
            overall: (sharpness + exposure + composition) / 3.0,
        }
    }
}
