//! Collection source port for feeding photo inputs into the pipeline.

use crate::pipeline::PhotoInput;

/// Port supplying the materialized photo collection and its external
/// signals.
pub trait CollectionSource: Send + Sync {
    /// Returns an iterator over photo inputs. Individual items may be
    /// errors when one record fails to load; one bad record must not
    /// abort the batch.
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoInput>> + Send + '_>;

    /// Returns the total number of photos, if known.
    fn count_hint(&self) -> Option<usize>;
}
