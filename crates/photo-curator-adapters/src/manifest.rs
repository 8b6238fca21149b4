//! Manifest-backed collection source and person matcher.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use photo_curator_core::domain::{PersonId, Photo, PhotoId};
use photo_curator_core::pipeline::PhotoInput;
use photo_curator_core::ports::{CollectionSource, PersonMatcher};

use crate::records::Manifest;

/// One manifest record after conversion. Bad records are kept as their
/// error text so the source can surface them per-item instead of
/// aborting the batch.
#[derive(Debug, Clone)]
enum Entry {
    Input(PhotoInput),
    Invalid(String),
}

/// Collection source backed by a JSON manifest file.
pub struct ManifestSource {
    entries: Vec<Entry>,
    people: HashMap<PhotoId, Vec<Option<PersonId>>>,
}

impl ManifestSource {
    /// Loads and converts a manifest file.
    ///
    /// Records that fail to convert are kept and surfaced as per-item
    /// errors from `photos()`; only an unreadable or malformed document
    /// fails the load itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// manifest document.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
        Ok(Self::from_manifest(manifest))
    }

    /// Converts an already-parsed manifest.
    #[must_use]
    pub fn from_manifest(manifest: Manifest) -> Self {
        let mut entries = Vec::with_capacity(manifest.photos.len());
        let mut people = HashMap::new();

        for record in manifest.photos {
            let asset_ref = record.asset_ref.clone();
            match record.into_input() {
                Ok((input, assignments)) => {
                    if assignments.iter().any(Option::is_some) {
                        people.insert(input.photo.id, assignments);
                    }
                    entries.push(Entry::Input(input));
                }
                Err(e) => {
                    warn!("skipping manifest record {asset_ref}: {e:#}");
                    entries.push(Entry::Invalid(format!("{asset_ref}: {e:#}")));
                }
            }
        }

        debug!("manifest loaded: {} records", entries.len());
        Self { entries, people }
    }

    /// Builds a person matcher from the manifest's per-face labels.
    /// Photos without labels identify every face as unknown.
    #[must_use]
    pub fn person_matcher(&self) -> ManifestPersonMatcher {
        ManifestPersonMatcher {
            table: self.people.clone(),
        }
    }
}

impl CollectionSource for ManifestSource {
    fn photos(&self) -> Box<dyn Iterator<Item = Result<PhotoInput>> + Send + '_> {
        Box::new(self.entries.iter().map(|entry| match entry {
            Entry::Input(input) => Ok(input.clone()),
            Entry::Invalid(message) => Err(anyhow!("{message}")),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Person matcher answering from the manifest's face labels.
pub struct ManifestPersonMatcher {
    table: HashMap<PhotoId, Vec<Option<PersonId>>>,
}

impl PersonMatcher for ManifestPersonMatcher {
    fn identify(&self, photo: &Photo) -> Result<Vec<Option<PersonId>>> {
        Ok(self
            .table
            .get(&photo.id)
            .cloned()
            .unwrap_or_else(|| vec![None; photo.faces.len()]))
    }
}
