//! Cluster curation: total ordering and representative selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ClusterId, Photo, PhotoCluster, PhotoId};

/// A cluster with its curated ordering and chosen representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedCluster {
    /// The cluster being curated.
    pub cluster: ClusterId,
    /// Member photos, best first.
    pub ranking: Vec<PhotoId>,
    /// The single photo standing for the cluster.
    pub representative: PhotoId,
}

/// Curates one cluster given its scored member photos.
///
/// Ranking is by overall score; the type-adaptive weighting already
/// happened upstream, so no re-weighting here. Exact-score ties break
/// by capture timestamp (earliest first), then by id, keeping the order
/// total and deterministic. Returns `None` when no members resolve.
#[must_use]
pub fn curate(cluster: &PhotoCluster, photos: &[Photo]) -> Option<CuratedCluster> {
    let mut members: Vec<&Photo> = cluster
        .photos
        .iter()
        .filter_map(|id| photos.iter().find(|p| p.id == *id))
        .collect();
    if members.is_empty() {
        return None;
    }

    members.sort_by(|a, b| {
        b.overall()
            .total_cmp(&a.overall())
            .then_with(|| a.captured_at.cmp(&b.captured_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let representative = pick_representative(&members);
    let ranking: Vec<PhotoId> = members.iter().map(|p| p.id).collect();

    debug!(
        cluster = %cluster.id,
        members = ranking.len(),
        representative = %representative,
        "curated cluster"
    );

    Some(CuratedCluster {
        cluster: cluster.id,
        ranking,
        representative,
    })
}

/// The top-ranked photo, except the zero-face override: when a strict
/// majority of members contain faces, a faceless photo must not stand
/// for the cluster, even on a marginally higher score. A scenic
/// accidental shot should not replace the people-shot as the cluster's
/// face. This is a hard override, not a weight adjustment.
fn pick_representative(ranked: &[&Photo]) -> PhotoId {
    let with_faces = ranked.iter().filter(|p| p.has_faces()).count();
    let majority_have_faces = with_faces * 2 > ranked.len();

    if majority_have_faces {
        if let Some(best_with_faces) = ranked.iter().find(|p| p.has_faces()) {
            return best_with_faces.id;
        }
    }
    ranked[0].id
}
