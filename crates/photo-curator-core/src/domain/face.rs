//! Per-face observation input and derived quality records.

use serde::{Deserialize, Serialize};

use super::clamp01;

/// A 2-D landmark point in normalized image coordinates (0-1, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// Face bounding box in normalized coordinates. All components are
/// clamped to [0, 1] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: clamp01(x),
            y: clamp01(y),
            width: clamp01(width),
            height: clamp01(height),
        }
    }
}

/// One detected face as delivered by the external landmark/detection
/// collaborator. This crate never touches pixels; everything it needs
/// arrives here as normalized geometry and scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Face bounding box.
    pub bbox: BoundingBox,
    /// Left eye landmarks. Six or more points are needed for EAR
    /// analysis; fewer degrades to neutral eye state.
    #[serde(default)]
    pub left_eye: Vec<Point>,
    /// Right eye landmarks, same contract as `left_eye`.
    #[serde(default)]
    pub right_eye: Vec<Point>,
    /// Outer lip contour. Twelve or more points are needed for smile
    /// analysis; fewer degrades to neutral smile quality.
    #[serde(default)]
    pub outer_lips: Vec<Point>,
    /// Head pitch in degrees, absent means 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    /// Head yaw in degrees, absent means 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f32>,
    /// Head roll in degrees, absent means 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll: Option<f32>,
    /// Detector's capture-quality scalar (0-1).
    pub capture_quality: f32,
    /// Face-region sharpness (0-1), absent means neutral 0.5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f32>,
}

/// Open/closed state of the two eyes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    /// Left eye open.
    pub left_open: bool,
    /// Right eye open.
    pub right_open: bool,
    /// Confidence in the open/closed call (0-1).
    pub confidence: f32,
}

impl EyeState {
    #[must_use]
    pub fn new(left_open: bool, right_open: bool, confidence: f32) -> Self {
        Self {
            left_open,
            right_open,
            confidence: clamp01(confidence),
        }
    }

    /// Both eyes open.
    #[must_use]
    pub const fn both_open(&self) -> bool {
        self.left_open && self.right_open
    }
}

/// Smile quality derived from the lip contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmileQuality {
    /// Upward lip curvature (0-1).
    pub intensity: f32,
    /// Left/right lip symmetry (0-1).
    pub naturalness: f32,
    /// Confidence in the estimate (0-1).
    pub confidence: f32,
}

impl SmileQuality {
    #[must_use]
    pub fn new(intensity: f32, naturalness: f32, confidence: f32) -> Self {
        Self {
            intensity: clamp01(intensity),
            naturalness: clamp01(naturalness),
            confidence: clamp01(confidence),
        }
    }

    /// A modest natural smile should outscore a big forced grin, so
    /// naturalness carries more weight than intensity.
    #[must_use]
    pub fn overall(&self) -> f32 {
        0.4 * self.intensity + 0.6 * self.naturalness
    }
}

/// Head pose angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceAngle {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl FaceAngle {
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Whether the pose is close enough to frontal to count as optimal.
    /// Boundary values are not optimal (strict inequality).
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.pitch.abs() < 15.0 && self.yaw.abs() < 20.0 && self.roll.abs() < 10.0
    }

    /// Whether a face at this pose can be transplanted onto a face at
    /// `other` without visible misalignment.
    #[must_use]
    pub fn is_alignment_compatible(&self, other: &Self) -> bool {
        (self.pitch - other.pitch).abs() < 25.0
            && (self.yaw - other.yaw).abs() < 30.0
            && (self.roll - other.roll).abs() < 20.0
    }
}

/// A quality problem detected on a face. Doubles as the improvement tag
/// on a planned face replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceIssue {
    /// At least one eye closed.
    EyesClosed,
    /// Face region blurred.
    BlurredFace,
    /// Weak or forced smile.
    PoorExpression,
    /// Low capture quality overall.
    AwkwardPose,
    /// Head turned away from optimal.
    UnflatteringAngle,
}

impl FaceIssue {
    /// Fixed severity ordering used to pick a face's primary issue.
    ///
    /// Eyes-closed outranks blur even though the two are numerically
    /// close; the ordering is a product decision, not derived from the
    /// rank weights.
    #[must_use]
    pub const fn severity(self) -> f32 {
        match self {
            Self::EyesClosed => 1.0,
            Self::BlurredFace => 0.9,
            Self::PoorExpression => 0.8,
            Self::AwkwardPose => 0.7,
            Self::UnflatteringAngle => 0.6,
        }
    }

    /// User-facing description of the issue.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::EyesClosed => "eyes closed",
            Self::BlurredFace => "face is blurred",
            Self::PoorExpression => "poor expression",
            Self::AwkwardPose => "awkward pose",
            Self::UnflatteringAngle => "unflattering angle",
        }
    }
}

/// Structured, numerically ranked quality record for one face.
///
/// Produced by the face quality analyzer; all component scalars are
/// clamped to [0, 1] at construction and never set outside analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceQuality {
    /// Face bounding box.
    pub bbox: BoundingBox,
    /// Detector capture-quality scalar (0-1).
    pub capture_quality: f32,
    /// Eye open/closed state.
    pub eyes: EyeState,
    /// Smile quality.
    pub smile: SmileQuality,
    /// Head pose.
    pub angle: FaceAngle,
    /// Face-region sharpness (0-1).
    pub sharpness: f32,
    /// Composite usability rank (0-1).
    pub rank: f32,
    /// All detected issues, most severe first.
    pub issues: Vec<FaceIssue>,
}

impl FaceQuality {
    /// The most severe issue, if any.
    #[must_use]
    pub fn primary_issue(&self) -> Option<FaceIssue> {
        self.issues.first().copied()
    }

    /// Whether no issues were detected.
    #[must_use]
    pub fn is_issue_free(&self) -> bool {
        self.issues.is_empty()
    }
}
