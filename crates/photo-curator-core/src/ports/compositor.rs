//! Compositor port.
//!
//! Pixel-level face blending happens outside this crate. The planner
//! emits `PersonFaceReplacement`s; a compositor consumes them and either
//! returns a handle to the composited result or a typed failure. Retry
//! policy belongs to the caller, not to this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PersonFaceReplacement, Photo};

/// Opaque handle to a composited image produced by the external
/// compositor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeHandle(pub String);

/// Typed compositor failure, tied to the replacement that caused it.
#[derive(Debug, Clone, Error)]
pub enum CompositeError {
    /// Source and destination faces could not be aligned.
    #[error("face alignment failed: {0}")]
    AlignmentFailed(String),
    /// Blending the aligned face into the destination failed.
    #[error("face blend failed: {0}")]
    BlendFailed(String),
}

/// Port to the external face compositor.
pub trait Compositor: Send + Sync {
    /// Applies one planned replacement to the base photo.
    ///
    /// # Errors
    ///
    /// Returns a typed failure; one failed replacement must not poison
    /// the rest of a cluster's plan.
    fn composite(
        &self,
        base: &Photo,
        replacement: &PersonFaceReplacement,
    ) -> Result<CompositeHandle, CompositeError>;
}
