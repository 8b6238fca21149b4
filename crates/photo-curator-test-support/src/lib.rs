//! Shared test fixtures for the photo-curator workspace.
//!
//! Builders assemble photos and face observations with plausible
//! landmark geometry; mocks implement the core ports with canned
//! behavior and captured calls. Test-only code, never a dependency of
//! the shipping crates.

pub mod builders;
pub mod mocks;

pub use builders::{FaceObservationBuilder, PhotoBuilder};
pub use mocks::{MockCollectionSource, MockCompositor, MockPersonMatcher, MockProgressSink};
