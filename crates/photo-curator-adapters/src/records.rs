//! Serde records for the JSON photo manifest.
//!
//! The manifest is the hand-off format from the upstream detection and
//! fingerprinting stages. Records deserialize into the core input types;
//! the only adapter-side representations are the hex-encoded hash
//! fingerprint and the optional per-face person label.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use photo_curator_core::domain::{
    FaceObservation, Fingerprint, GeoPoint, PersonId, Photo, PhotoMetadata, PhotoType,
};
use photo_curator_core::modules::TechnicalSignals;
use photo_curator_core::pipeline::PhotoInput;

/// Top-level manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// All photo records, in no particular order.
    pub photos: Vec<PhotoRecord>,
}

/// One photo entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRecord {
    /// Reference into the external asset source.
    pub asset_ref: String,
    /// Capture timestamp, RFC 3339.
    pub captured_at: DateTime<Utc>,
    /// Capture location, if recorded.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Camera/image metadata.
    #[serde(default)]
    pub metadata: PhotoMetadata,
    /// Perceptual fingerprint computed upstream.
    #[serde(default)]
    pub fingerprint: Option<FingerprintRecord>,
    /// Upstream content-type classification.
    pub photo_type: PhotoType,
    /// Image-level technical signals.
    #[serde(default)]
    pub technical: TechnicalSignals,
    /// Contextual desirability signal.
    #[serde(default)]
    pub context: Option<f32>,
    /// Detected faces with landmarks.
    #[serde(default)]
    pub faces: Vec<FaceRecord>,
}

/// One detected face plus its optional identity label.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceRecord {
    /// Landmark geometry and detector scalars.
    #[serde(flatten)]
    pub observation: FaceObservation,
    /// Person label assigned by the upstream recognizer, if any.
    #[serde(default)]
    pub person: Option<String>,
}

/// Fingerprint as it appears in the manifest. Hashes are hex strings;
/// embeddings are plain float arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintRecord {
    /// Hex-encoded perceptual hash.
    Hash(String),
    /// Float embedding vector.
    Embedding(Vec<f32>),
}

impl FingerprintRecord {
    /// Converts to the core fingerprint type.
    ///
    /// # Errors
    ///
    /// Returns an error if a hash string is not valid hex.
    pub fn into_fingerprint(self) -> Result<Fingerprint> {
        match self {
            Self::Hash(hex) => Ok(Fingerprint::Hash(
                decode_hex(&hex).context("invalid hash fingerprint")?,
            )),
            Self::Embedding(values) => Ok(Fingerprint::Embedding(values)),
        }
    }
}

impl PhotoRecord {
    /// Converts the record into a pipeline input plus the per-face
    /// person assignments, in face order.
    ///
    /// # Errors
    ///
    /// Returns an error if the fingerprint cannot be decoded.
    pub fn into_input(self) -> Result<(PhotoInput, Vec<Option<PersonId>>)> {
        let fingerprint = self
            .fingerprint
            .map(FingerprintRecord::into_fingerprint)
            .transpose()
            .with_context(|| format!("record {}", self.asset_ref))?;

        let mut photo = Photo::new(self.asset_ref, self.captured_at);
        photo.location = self.location;
        photo.metadata = self.metadata;
        photo.fingerprint = fingerprint;

        let mut observations = Vec::with_capacity(self.faces.len());
        let mut people = Vec::with_capacity(self.faces.len());
        for face in self.faces {
            observations.push(face.observation);
            people.push(face.person.map(PersonId::new));
        }

        let input = PhotoInput {
            photo,
            photo_type: self.photo_type,
            technical: self.technical,
            context: self.context,
            observations,
        };
        Ok((input, people))
    }
}

/// Decodes a hex string into bytes.
fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("hex string has odd length {}", hex.len());
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let pair = hex
            .get(i..i + 2)
            .context("hex string is not ASCII-aligned")?;
        let byte =
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex pair {pair:?}"))?;
        bytes.push(byte);
    }
    Ok(bytes)
}
