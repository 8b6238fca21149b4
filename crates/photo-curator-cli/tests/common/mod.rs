//! Shared manifest fixtures for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Two clean group shots three seconds apart, near-identical
/// fingerprints. Clusters into a single burst with no face issues.
pub const CLEAN_BURST: &str = r#"{
    "photos": [
        {
            "asset_ref": "asset://burst-1",
            "captured_at": "2024-06-01T12:00:00Z",
            "fingerprint": {"hash": "a1b2c3d4e5f60718"},
            "photo_type": "group",
            "technical": {"sharpness": 0.9, "exposure": 0.8},
            "faces": [
                {
                    "bbox": {"x": 0.2, "y": 0.2, "width": 0.2, "height": 0.25},
                    "capture_quality": 0.9,
                    "sharpness": 0.85,
                    "person": "alice"
                }
            ]
        },
        {
            "asset_ref": "asset://burst-2",
            "captured_at": "2024-06-01T12:00:03Z",
            "fingerprint": {"hash": "a1b2c3d4e5f60719"},
            "photo_type": "group",
            "technical": {"sharpness": 0.85, "exposure": 0.8},
            "faces": [
                {
                    "bbox": {"x": 0.2, "y": 0.2, "width": 0.2, "height": 0.25},
                    "capture_quality": 0.8,
                    "sharpness": 0.85,
                    "person": "alice"
                }
            ]
        }
    ]
}"#;

/// The same burst with every person label stripped. Faces are present
/// but nobody is identified.
pub const UNLABELED_BURST: &str = r#"{
    "photos": [
        {
            "asset_ref": "asset://burst-1",
            "captured_at": "2024-06-01T12:00:00Z",
            "fingerprint": {"hash": "a1b2c3d4e5f60718"},
            "photo_type": "group",
            "technical": {"sharpness": 0.9, "exposure": 0.8},
            "faces": [
                {
                    "bbox": {"x": 0.2, "y": 0.2, "width": 0.2, "height": 0.25},
                    "capture_quality": 0.9,
                    "sharpness": 0.85
                }
            ]
        },
        {
            "asset_ref": "asset://burst-2",
            "captured_at": "2024-06-01T12:00:03Z",
            "fingerprint": {"hash": "a1b2c3d4e5f60719"},
            "photo_type": "group",
            "technical": {"sharpness": 0.85, "exposure": 0.8},
            "faces": [
                {
                    "bbox": {"x": 0.2, "y": 0.2, "width": 0.2, "height": 0.25},
                    "capture_quality": 0.8,
                    "sharpness": 0.85
                }
            ]
        }
    ]
}"#;

/// One photo whose only face was caught mid-motion. Flags an awkward
/// pose.
pub const AWKWARD_SINGLE: &str = r#"{
    "photos": [
        {
            "asset_ref": "asset://awkward",
            "captured_at": "2024-06-01T12:00:00Z",
            "photo_type": "portrait",
            "faces": [
                {
                    "bbox": {"x": 0.3, "y": 0.2, "width": 0.3, "height": 0.4},
                    "capture_quality": 0.3,
                    "sharpness": 0.85
                }
            ]
        }
    ]
}"#;

/// Writes a manifest into a fresh temp directory, returning the
/// directory (kept alive by the caller) and the manifest path.
pub fn write_manifest(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("manifest.json");
    fs::write(&path, content).expect("write manifest");
    (dir, path)
}
