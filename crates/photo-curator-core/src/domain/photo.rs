//! Photo records, identity and perceptual fingerprints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FaceQuality, PhotoScore};

/// Opaque photo identity. Photos and clusters reference each other by id,
/// never by live pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Geographic coordinate attached to a photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Capture metadata carried over from the asset source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Camera model, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    /// Lens model, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    /// ISO sensitivity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    /// Aperture as f-number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f32>,
    /// Exposure time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<f32>,
}

/// Compact perceptual descriptor used for cheap similarity comparison.
///
/// The bytes/floats are opaque to this crate; only pairwise distance is
/// interpreted, and only between fingerprints of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fingerprint {
    /// Bit-level hash (dHash/pHash style). Compared by normalized Hamming
    /// distance.
    Hash(Vec<u8>),
    /// Float embedding. Compared by normalized Euclidean distance.
    Embedding(Vec<f32>),
}

impl Fingerprint {
    /// Normalized distance in [0, 1] between two fingerprints of the same
    /// kind. Returns `None` for mismatched kinds or empty descriptors,
    /// which callers treat as "not comparable".
    #[must_use]
    pub fn distance(&self, other: &Self) -> Option<f64> {
        match (self, other) {
            (Self::Hash(a), Self::Hash(b)) => {
                if a.is_empty() || a.len() != b.len() {
                    return None;
                }
                let differing: u32 = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x ^ y).count_ones())
                    .sum();
                let total_bits = (a.len() * 8) as f64;
                Some(f64::from(differing) / total_bits)
            }
            (Self::Embedding(a), Self::Embedding(b)) => {
                if a.is_empty() || a.len() != b.len() {
                    return None;
                }
                let sum_sq: f64 = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| {
                        let d = f64::from(x - y);
                        d * d
                    })
                    .sum();
                // Scale by dimension so the threshold is length-independent.
                Some((sum_sq / a.len() as f64).sqrt().min(1.0))
            }
            _ => None,
        }
    }
}

/// A single photo in the collection.
///
/// Created at import; scoring stages attach data as they complete. Scores
/// are replaced whole (`with_score`), never mutated field-by-field, so
/// concurrent scoring races are impossible by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Stable identity within the collection.
    pub id: PhotoId,
    /// Reference into the external asset source.
    pub asset_ref: String,
    /// Capture timestamp.
    pub captured_at: DateTime<Utc>,
    /// Capture location, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Camera/image metadata.
    pub metadata: PhotoMetadata,
    /// Perceptual fingerprint, if one was computed upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    /// Cluster membership, set by the cluster engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<super::ClusterId>,
    /// Per-face quality analyses, attached by the face analyzer.
    #[serde(default)]
    pub faces: Vec<FaceQuality>,
    /// Composite quality score, attached by the aggregator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<PhotoScore>,
}

impl Photo {
    /// Creates an unscored photo from import-time data.
    #[must_use]
    pub fn new(asset_ref: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: PhotoId::new(),
            asset_ref: asset_ref.into(),
            captured_at,
            location: None,
            metadata: PhotoMetadata::default(),
            fingerprint: None,
            cluster: None,
            faces: Vec::new(),
            score: None,
        }
    }

    /// Attaches a score, replacing any previous one whole.
    #[must_use]
    pub fn with_score(mut self, score: PhotoScore) -> Self {
        self.score = Some(score);
        self
    }

    /// Attaches the per-face analyses produced by the face analyzer.
    #[must_use]
    pub fn with_faces(mut self, faces: Vec<FaceQuality>) -> Self {
        self.faces = faces;
        self
    }

    /// Overall score, or 0 if the photo has not been scored yet.
    #[must_use]
    pub fn overall(&self) -> f32 {
        self.score.as_ref().map_or(0.0, |s| s.overall)
    }

    /// Whether the photo contains at least one detected face.
    #[must_use]
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }
}
