//! Fingerprint and time-window clustering.
//!
//! A single left-to-right scan over chronologically ordered photos.
//! Each photo extends the most recent open cluster whose time window
//! and fingerprint neighborhood it fits, or opens a new one. This is
//! deliberately not a general nearest-neighbor clustering; burst and
//! near-duplicate groups in a camera roll are contiguous in time.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Photo, PhotoCluster};

/// Clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Maximum gap in seconds between a photo and the cluster's most
    /// recent member.
    pub time_window_secs: i64,
    /// Fingerprint distance below which two photos are similar (0-1).
    pub similarity_threshold: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            time_window_secs: 10,
            similarity_threshold: 0.25,
        }
    }
}

/// Fingerprint/time-window cluster engine.
pub struct ClusterEngine {
    config: ClusterConfig,
}

impl ClusterEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Partitions the photos into clusters.
    ///
    /// Photos are sorted chronologically first (ties broken by id), so
    /// the partition is deterministic and idempotent for a given input
    /// set and configuration. Photos without a fingerprint become
    /// singleton clusters rather than failing the run.
    #[must_use]
    pub fn cluster(&self, photos: &[Photo]) -> Vec<PhotoCluster> {
        let mut ordered: Vec<&Photo> = photos.iter().collect();
        ordered.sort_by(|a, b| {
            a.captured_at
                .cmp(&b.captured_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let window = Duration::seconds(self.config.time_window_secs);
        let mut closed: Vec<PhotoCluster> = Vec::new();
        let mut open: Vec<PhotoCluster> = Vec::new();

        for photo in ordered {
            // Expire open clusters the scan has moved past.
            let mut i = 0;
            while i < open.len() {
                let expired = open[i]
                    .last_timestamp()
                    .is_some_and(|last| photo.captured_at - last > window);
                if expired {
                    closed.push(open.swap_remove(i));
                } else {
                    i += 1;
                }
            }

            let Some(fingerprint) = &photo.fingerprint else {
                debug!(photo = %photo.id, "no fingerprint, singleton cluster");
                closed.push(PhotoCluster::seeded_with(photo));
                continue;
            };

            // Most recent compatible open cluster wins.
            let target = open
                .iter_mut()
                .filter(|cluster| {
                    cluster
                        .fingerprint
                        .as_ref()
                        .and_then(|rep| rep.distance(fingerprint))
                        .is_some_and(|d| d < self.config.similarity_threshold)
                })
                .max_by_key(|cluster| cluster.last_timestamp());

            match target {
                Some(cluster) => cluster.add(photo),
                None => open.push(PhotoCluster::seeded_with(photo)),
            }
        }

        closed.append(&mut open);
        // Scan order for the output as well.
        closed.sort_by_key(|c| (c.median_timestamp(), c.photos.first().copied()));

        debug!(clusters = closed.len(), photos = photos.len(), "clustered");
        closed
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}
