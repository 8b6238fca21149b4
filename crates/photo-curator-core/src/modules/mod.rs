//! Scoring and analysis modules.
//!
//! Each module turns externally supplied signals into one of the score
//! records in [`crate::domain`].

mod composite;
mod context;
mod face_quality;
mod technical;

pub use composite::ScoreAggregator;
pub use context::ContextScorer;
pub use face_quality::{EarBand, FaceQualityAnalyzer, FaceQualityConfig};
pub use technical::{TechnicalScore, TechnicalScorer, TechnicalSignals};
