//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the curation core and its
//! external collaborators.

mod collection_source;
mod compositor;
mod person_matcher;
mod progress;

pub use collection_source::CollectionSource;
pub use compositor::{CompositeError, CompositeHandle, Compositor};
pub use person_matcher::PersonMatcher;
pub use progress::{NullProgressSink, ProgressEvent, ProgressSink};
