//! Builders for synthetic observations and photos.

use chrono::{DateTime, TimeZone, Utc};
use photo_curator_core::domain::{
    BoundingBox, FaceObservation, Fingerprint, Photo, PhotoMetadata, Point,
};

/// Builder for synthetic face observations with controllable geometry.
///
/// Defaults to a frontal, sharp, wide-eyed, mildly smiling face; each
/// method perturbs one aspect.
#[derive(Debug, Clone)]
pub struct FaceObservationBuilder {
    eye_opening: f32,
    left_eye_opening: Option<f32>,
    corner_lift: f32,
    lip_asymmetry: f32,
    pitch: f32,
    yaw: f32,
    roll: f32,
    capture_quality: f32,
    sharpness: Option<f32>,
}

impl FaceObservationBuilder {
    /// A frontal face with open eyes and a natural smile.
    #[must_use]
    pub fn frontal() -> Self {
        Self {
            eye_opening: 0.06,
            left_eye_opening: None,
            corner_lift: 0.025,
            lip_asymmetry: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            capture_quality: 0.85,
            sharpness: Some(0.85),
        }
    }

    /// Both eyes shut.
    #[must_use]
    pub fn eyes_closed(mut self) -> Self {
        self.eye_opening = 0.002;
        self.left_eye_opening = None;
        self
    }

    /// Only the left eye shut (a wink, or a blink caught mid-frame).
    #[must_use]
    pub fn left_eye_closed(mut self) -> Self {
        self.left_eye_opening = Some(0.002);
        self
    }

    /// Flat, unsmiling mouth.
    #[must_use]
    pub fn deadpan(mut self) -> Self {
        self.corner_lift = 0.0;
        self
    }

    /// Lopsided smile.
    #[must_use]
    pub fn lopsided_smile(mut self) -> Self {
        self.lip_asymmetry = 0.08;
        self
    }

    /// Head turned by the given yaw degrees.
    #[must_use]
    pub fn turned(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Full pose control.
    #[must_use]
    pub fn posed(mut self, pitch: f32, yaw: f32, roll: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self
    }

    /// Blurred face region.
    #[must_use]
    pub fn blurred(mut self) -> Self {
        self.sharpness = Some(0.2);
        self
    }

    /// Detector capture quality.
    #[must_use]
    pub fn capture_quality(mut self, quality: f32) -> Self {
        self.capture_quality = quality;
        self
    }

    /// Builds the observation.
    #[must_use]
    pub fn build(self) -> FaceObservation {
        FaceObservation {
            bbox: BoundingBox::new(0.3, 0.2, 0.25, 0.35),
            left_eye: eye_points(self.left_eye_opening.unwrap_or(self.eye_opening)),
            right_eye: eye_points(self.eye_opening),
            outer_lips: lip_points(self.corner_lift, self.lip_asymmetry),
            pitch: Some(self.pitch),
            yaw: Some(self.yaw),
            roll: Some(self.roll),
            capture_quality: self.capture_quality,
            sharpness: self.sharpness,
        }
    }
}

/// Six-point eye contour with the given vertical opening.
fn eye_points(opening: f32) -> Vec<Point> {
    let half = opening / 2.0;
    vec![
        Point::new(0.40, 0.30),
        Point::new(0.43, 0.30 - half),
        Point::new(0.47, 0.30 - half),
        Point::new(0.50, 0.30),
        Point::new(0.47, 0.30 + half),
        Point::new(0.43, 0.30 + half),
    ]
}

/// Twelve-point outer lip contour. `corner_lift` raises the corners
/// above the lip centre (y points down); `asymmetry` widens the right
/// half.
fn lip_points(corner_lift: f32, asymmetry: f32) -> Vec<Point> {
    let cy = 0.55;
    vec![
        Point::new(0.35, cy - corner_lift),
        Point::new(0.39, cy - 0.01),
        Point::new(0.43, cy - 0.015),
        Point::new(0.45, cy - 0.015),
        Point::new(0.47, cy - 0.015),
        Point::new(0.51, cy - 0.01),
        Point::new(0.55 + asymmetry, cy - corner_lift),
        Point::new(0.51, cy + 0.01),
        Point::new(0.47, cy + 0.015),
        Point::new(0.45, cy + 0.015),
        Point::new(0.43, cy + 0.015),
        Point::new(0.39, cy + 0.01),
    ]
}

/// Builder for synthetic photos.
#[derive(Debug, Clone)]
pub struct PhotoBuilder {
    asset_ref: String,
    captured_at: DateTime<Utc>,
    fingerprint: Option<Fingerprint>,
}

impl PhotoBuilder {
    /// A photo captured `secs` seconds into the epoch.
    #[must_use]
    pub fn at(secs: i64) -> Self {
        Self {
            asset_ref: format!("asset://{secs}"),
            captured_at: Utc.timestamp_opt(secs, 0).single().unwrap_or_default(),
            fingerprint: None,
        }
    }

    /// Names the external asset reference.
    #[must_use]
    pub fn asset_ref(mut self, asset_ref: impl Into<String>) -> Self {
        self.asset_ref = asset_ref.into();
        self
    }

    /// Attaches a hash fingerprint of repeated `byte`s.
    #[must_use]
    pub fn hash_fingerprint(mut self, byte: u8) -> Self {
        self.fingerprint = Some(Fingerprint::Hash(vec![byte; 8]));
        self
    }

    /// Builds the photo.
    #[must_use]
    pub fn build(self) -> Photo {
        let mut photo = Photo::new(self.asset_ref, self.captured_at);
        photo.metadata = PhotoMetadata {
            width: 4032,
            height: 3024,
            ..PhotoMetadata::default()
        };
        photo.fingerprint = self.fingerprint;
        photo
    }
}
