//! Photo clusters produced by the fingerprint/time-window engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Fingerprint, GeoPoint, Photo, PhotoId};

/// Opaque cluster identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(Uuid);

impl ClusterId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClusterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A group of photos sharing a fingerprint neighborhood and time window.
///
/// Members are referenced by id only; the owning collection resolves
/// them. A cluster grows by [`PhotoCluster::add`] and never shrinks
/// except by explicit removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoCluster {
    /// Cluster identity.
    pub id: ClusterId,
    /// Member photo ids, in scan (chronological) order.
    pub photos: Vec<PhotoId>,
    /// Representative fingerprint (the first member's), used for
    /// membership tests during the scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    /// When the cluster was created.
    pub created_at: DateTime<Utc>,
    // Member data carried for the derived aggregates; ids alone are not
    // enough once the owning collection is out of reach.
    timestamps: Vec<DateTime<Utc>>,
    locations: Vec<GeoPoint>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl PhotoCluster {
    /// Creates a cluster seeded with its first photo.
    #[must_use]
    pub fn seeded_with(photo: &Photo) -> Self {
        let mut cluster = Self {
            id: ClusterId::new(),
            photos: Vec::new(),
            fingerprint: photo.fingerprint.clone(),
            created_at: Utc::now(),
            timestamps: Vec::new(),
            locations: Vec::new(),
            last_timestamp: None,
        };
        cluster.add(photo);
        cluster
    }

    /// Adds a photo to the cluster and updates the derived aggregates.
    pub fn add(&mut self, photo: &Photo) {
        self.photos.push(photo.id);
        self.timestamps.push(photo.captured_at);
        if let Some(loc) = photo.location {
            self.locations.push(loc);
        }
        self.last_timestamp = Some(photo.captured_at);
    }

    /// Removes a photo by id. Returns whether it was present.
    pub fn remove(&mut self, id: PhotoId) -> bool {
        let Some(pos) = self.photos.iter().position(|p| *p == id) else {
            return false;
        };
        self.photos.remove(pos);
        self.timestamps.remove(pos);
        true
    }

    /// Number of member photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Whether the cluster has no members. Guarded against at
    /// construction but kept for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Capture timestamp of the most recently added member.
    #[must_use]
    pub const fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    /// Median capture timestamp across members.
    #[must_use]
    pub fn median_timestamp(&self) -> Option<DateTime<Utc>> {
        if self.timestamps.is_empty() {
            return None;
        }
        let mut sorted = self.timestamps.clone();
        sorted.sort_unstable();
        Some(sorted[sorted.len() / 2])
    }

    /// Mean location across members that carry one.
    #[must_use]
    pub fn mean_location(&self) -> Option<GeoPoint> {
        if self.locations.is_empty() {
            return None;
        }
        let n = self.locations.len() as f64;
        Some(GeoPoint {
            latitude: self.locations.iter().map(|l| l.latitude).sum::<f64>() / n,
            longitude: self.locations.iter().map(|l| l.longitude).sum::<f64>() / n,
        })
    }
}
