//! Photo Curator Adapters - External adapters for photo-curator.
//!
//! This crate provides adapters for:
//! - JSON manifest collection source
//! - Manifest-derived person matching

pub mod manifest;
pub mod records;

pub use manifest::{ManifestPersonMatcher, ManifestSource};
pub use records::{FaceRecord, FingerprintRecord, Manifest, PhotoRecord};
