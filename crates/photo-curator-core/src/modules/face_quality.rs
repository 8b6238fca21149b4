//! Face quality analysis.
//!
//! Converts one external `FaceObservation` into a ranked `FaceQuality`
//! record:
//! - EAR (eye aspect ratio) with an adaptive, band-selected threshold
//! - smile intensity/naturalness from the outer lip contour
//! - head pose optimality
//! - composite usability rank and issue list

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    clamp01, EyeState, FaceAngle, FaceIssue, FaceObservation, FaceQuality, Point, SmileQuality,
};

/// One band of the adaptive EAR threshold table: observations whose
/// average EAR falls below `upper_bound` use `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarBand {
    /// Exclusive upper bound on the average EAR for this band.
    pub upper_bound: f32,
    /// Open/closed threshold applied within the band.
    pub threshold: f32,
}

/// Configuration for face quality analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceQualityConfig {
    /// Adaptive EAR threshold bands, ordered by ascending upper bound.
    /// The last band's threshold also covers everything above its bound.
    /// Individual eye geometry varies, so wide eyes get a higher bar
    /// than naturally narrow ones.
    pub ear_bands: Vec<EarBand>,
    /// Minimum landmark points per eye for EAR analysis.
    pub min_eye_points: usize,
    /// Minimum landmark points on the outer lip contour for smile
    /// analysis.
    pub min_lip_points: usize,
    /// Gain applied to relative lip curvature when deriving smile
    /// intensity.
    pub smile_gain: f32,
    /// Smile overall below this is a poor expression.
    pub poor_expression_threshold: f32,
    /// Face sharpness below this is a blurred face.
    pub blur_threshold: f32,
    /// Capture quality below this is an awkward pose.
    pub awkward_pose_threshold: f32,
}

impl Default for FaceQualityConfig {
    fn default() -> Self {
        Self {
            ear_bands: vec![
                EarBand {
                    upper_bound: 0.15,
                    threshold: 0.12,
                },
                EarBand {
                    upper_bound: 0.20,
                    threshold: 0.15,
                },
                EarBand {
                    upper_bound: 0.25,
                    threshold: 0.18,
                },
                EarBand {
                    upper_bound: f32::INFINITY,
                    threshold: 0.21,
                },
            ],
            min_eye_points: 6,
            min_lip_points: 12,
            smile_gain: 5.0,
            poor_expression_threshold: 0.5,
            blur_threshold: 0.6,
            awkward_pose_threshold: 0.5,
        }
    }
}

/// Face quality analyzer.
pub struct FaceQualityAnalyzer {
    config: FaceQualityConfig,
}

impl FaceQualityAnalyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: FaceQualityConfig) -> Self {
        Self { config }
    }

    /// Analyzes one observation into a `FaceQuality` record.
    #[must_use]
    pub fn analyze(&self, obs: &FaceObservation) -> FaceQuality {
        let capture_quality = clamp01(obs.capture_quality);
        // Absent sharpness is a missing optional signal, not a failure.
        let sharpness = clamp01(obs.sharpness.unwrap_or(0.5));

        let eyes = self.eye_state(obs);
        let smile = self.smile_quality(obs);
        let angle = FaceAngle::new(
            obs.pitch.unwrap_or(0.0),
            obs.yaw.unwrap_or(0.0),
            obs.roll.unwrap_or(0.0),
        );

        let rank = composite_rank(capture_quality, &eyes, &smile, sharpness, &angle);
        let issues = self.detect_issues(capture_quality, &eyes, &smile, sharpness, &angle);

        debug!(
            rank,
            left_open = eyes.left_open,
            right_open = eyes.right_open,
            smile = smile.overall(),
            issues = issues.len(),
            "analyzed face"
        );

        FaceQuality {
            bbox: obs.bbox,
            capture_quality,
            eyes,
            smile,
            angle,
            sharpness,
            rank,
            issues,
        }
    }

    /// Derives the eye open/closed state from the eye landmark sets.
    fn eye_state(&self, obs: &FaceObservation) -> EyeState {
        let left_ear = eye_aspect_ratio(&obs.left_eye, self.config.min_eye_points);
        let right_ear = eye_aspect_ratio(&obs.right_eye, self.config.min_eye_points);

        let (Some(left_ear), Some(right_ear)) = (left_ear, right_ear) else {
            // Too few landmark points: degrade to open at half
            // confidence rather than failing the face.
            return EyeState::new(true, true, 0.5);
        };

        let avg_ear = (left_ear + right_ear) / 2.0;
        let threshold = self.adaptive_threshold(avg_ear);
        let confidence = (avg_ear / threshold).min(1.0);

        debug!(left_ear, right_ear, threshold, "eye state");

        EyeState::new(left_ear > threshold, right_ear > threshold, confidence)
    }

    /// Picks the open/closed threshold band for the observed EAR
    /// magnitude.
    fn adaptive_threshold(&self, avg_ear: f32) -> f32 {
        self.config
            .ear_bands
            .iter()
            .find(|band| avg_ear < band.upper_bound)
            .or(self.config.ear_bands.last())
            .map_or(0.15, |band| band.threshold)
    }

    /// Derives smile quality from the outer lip contour.
    fn smile_quality(&self, obs: &FaceObservation) -> SmileQuality {
        let lips = &obs.outer_lips;
        if lips.len() < self.config.min_lip_points {
            // Degrade to a neutral smile.
            return SmileQuality::new(0.5, 0.5, 0.5);
        }

        // Contour convention: point 0 is the left corner, the point half
        // way around is the right corner, the quarter points sit at the
        // top and bottom centre of the mouth.
        let left_corner = lips[0];
        let right_corner = lips[lips.len() / 2];
        let top_center = lips[lips.len() / 4];
        let bottom_center = lips[3 * lips.len() / 4];
        let center = Point::new(
            (top_center.x + bottom_center.x) / 2.0,
            (top_center.y + bottom_center.y) / 2.0,
        );

        let mouth_width = left_corner.distance(&right_corner).max(f32::EPSILON);

        // y grows downward, so corners above the lip centre mean upward
        // curvature.
        let curvature = center.y - (left_corner.y + right_corner.y) / 2.0;
        let intensity = clamp01(curvature / mouth_width * self.config.smile_gain);

        let left_width = (center.x - left_corner.x).abs();
        let right_width = (right_corner.x - center.x).abs();
        let wider = left_width.max(right_width);
        let naturalness = if wider <= f32::EPSILON {
            0.0
        } else {
            clamp01(1.0 - (left_width - right_width).abs() / wider)
        };

        SmileQuality::new(intensity, naturalness, 1.0)
    }

    /// Collects the issues affecting a face, most severe first.
    fn detect_issues(
        &self,
        capture_quality: f32,
        eyes: &EyeState,
        smile: &SmileQuality,
        sharpness: f32,
        angle: &FaceAngle,
    ) -> Vec<FaceIssue> {
        let mut issues = Vec::new();
        if !eyes.both_open() {
            issues.push(FaceIssue::EyesClosed);
        }
        if sharpness < self.config.blur_threshold {
            issues.push(FaceIssue::BlurredFace);
        }
        if smile.overall() < self.config.poor_expression_threshold {
            issues.push(FaceIssue::PoorExpression);
        }
        if capture_quality < self.config.awkward_pose_threshold {
            issues.push(FaceIssue::AwkwardPose);
        }
        if !angle.is_optimal() {
            issues.push(FaceIssue::UnflatteringAngle);
        }
        issues.sort_by(|a, b| b.severity().total_cmp(&a.severity()));
        issues
    }
}

impl Default for FaceQualityAnalyzer {
    fn default() -> Self {
        Self::new(FaceQualityConfig::default())
    }
}

/// EAR over a six-or-more point eye contour: the ratio of the two
/// vertical point-pair distances to twice the corner-to-corner width.
/// Returns `None` when too few points are available.
fn eye_aspect_ratio(points: &[Point], min_points: usize) -> Option<f32> {
    if points.len() < min_points.max(6) {
        return None;
    }

    // Standard 6-point layout: p0/p3 are the corners, (p1,p5) and
    // (p2,p4) are the vertical pairs.
    let horizontal = points[0].distance(&points[3]);
    if horizontal <= f32::EPSILON {
        return None;
    }
    let vertical = points[1].distance(&points[5]) + points[2].distance(&points[4]);
    Some(vertical / (2.0 * horizontal))
}

/// Composite usability rank for one face.
fn composite_rank(
    capture_quality: f32,
    eyes: &EyeState,
    smile: &SmileQuality,
    sharpness: f32,
    angle: &FaceAngle,
) -> f32 {
    let eye_component = if eyes.both_open() { 1.0 } else { 0.0 };
    let angle_component = if angle.is_optimal() { 1.0 } else { 0.5 };
    clamp01(
        0.3 * capture_quality
            + 0.25 * eye_component
            + 0.2 * smile.overall()
            + 0.15 * sharpness
            + 0.1 * angle_component,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;

    /// Six-point eye with the given opening: corners at x=0 and x=0.1,
    /// vertical pairs `opening` apart.
    fn eye_points(opening: f32) -> Vec<Point> {
        let half = opening / 2.0;
        vec![
            Point::new(0.0, 0.5),
            Point::new(0.03, 0.5 - half),
            Point::new(0.07, 0.5 - half),
            Point::new(0.1, 0.5),
            Point::new(0.07, 0.5 + half),
            Point::new(0.03, 0.5 + half),
        ]
    }

    /// Twelve-point outer lip contour. `corner_lift` raises the corners
    /// above the lip centre (y down); `asymmetry` shifts the right
    /// corner outward.
    fn lip_points(corner_lift: f32, asymmetry: f32) -> Vec<Point> {
        let cy = 0.7;
        let mut points = vec![Point::new(0.0, cy - corner_lift)]; // left corner
        // Upper lip toward right corner.
        points.push(Point::new(0.04, cy - 0.01));
        points.push(Point::new(0.08, cy - 0.015));
        points.push(Point::new(0.1, cy - 0.015)); // top centre
        points.push(Point::new(0.12, cy - 0.015));
        points.push(Point::new(0.16, cy - 0.01));
        points.push(Point::new(0.2 + asymmetry, cy - corner_lift)); // right corner
        // Lower lip back toward the left corner.
        points.push(Point::new(0.16, cy + 0.01));
        points.push(Point::new(0.12, cy + 0.015));
        points.push(Point::new(0.1, cy + 0.015)); // bottom centre
        points.push(Point::new(0.08, cy + 0.015));
        points.push(Point::new(0.04, cy + 0.01));
        points
    }

    fn observation(left_opening: f32, right_opening: f32) -> FaceObservation {
        FaceObservation {
            bbox: BoundingBox::new(0.2, 0.2, 0.3, 0.3),
            left_eye: eye_points(left_opening),
            right_eye: eye_points(right_opening),
            outer_lips: lip_points(0.02, 0.0),
            pitch: Some(0.0),
            yaw: Some(0.0),
            roll: Some(0.0),
            capture_quality: 0.8,
            sharpness: Some(0.8),
        }
    }

    #[test]
    fn wide_open_eyes_are_open() {
        let analyzer = FaceQualityAnalyzer::default();
        let quality = analyzer.analyze(&observation(0.07, 0.07));
        assert!(quality.eyes.left_open);
        assert!(quality.eyes.right_open);
        assert!(!quality.issues.contains(&FaceIssue::EyesClosed));
    }

    #[test]
    fn shut_eyes_are_closed() {
        let analyzer = FaceQualityAnalyzer::default();
        let quality = analyzer.analyze(&observation(0.002, 0.002));
        assert!(!quality.eyes.left_open);
        assert!(!quality.eyes.right_open);
        assert_eq!(quality.primary_issue(), Some(FaceIssue::EyesClosed));
    }

    #[test]
    fn one_closed_eye_flags_eyes_closed() {
        let analyzer = FaceQualityAnalyzer::default();
        let quality = analyzer.analyze(&observation(0.07, 0.002));
        assert!(quality.issues.contains(&FaceIssue::EyesClosed));
    }

    #[test]
    fn too_few_eye_points_degrades_to_neutral() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.left_eye.truncate(3);

        let quality = analyzer.analyze(&obs);
        assert!(quality.eyes.left_open);
        assert!(quality.eyes.right_open);
        assert!((quality.eyes.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn eye_confidence_monotone_in_ear_within_band() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut last = 0.0_f32;
        for opening in [0.010, 0.014, 0.018, 0.022] {
            let quality = analyzer.analyze(&observation(opening, opening));
            assert!(
                quality.eyes.confidence >= last,
                "confidence regressed at opening {opening}"
            );
            last = quality.eyes.confidence;
        }
    }

    #[test]
    fn adaptive_threshold_rises_with_ear() {
        let analyzer = FaceQualityAnalyzer::default();
        assert!((analyzer.adaptive_threshold(0.10) - 0.12).abs() < f32::EPSILON);
        assert!((analyzer.adaptive_threshold(0.17) - 0.15).abs() < f32::EPSILON);
        assert!((analyzer.adaptive_threshold(0.22) - 0.18).abs() < f32::EPSILON);
        assert!((analyzer.adaptive_threshold(0.40) - 0.21).abs() < f32::EPSILON);
    }

    #[test]
    fn symmetric_smile_is_natural() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.outer_lips = lip_points(0.03, 0.0);

        let quality = analyzer.analyze(&obs);
        assert!(quality.smile.naturalness > 0.95);
        assert!(quality.smile.intensity > 0.0);
    }

    #[test]
    fn asymmetric_smile_loses_naturalness() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut symmetric = observation(0.07, 0.07);
        symmetric.outer_lips = lip_points(0.03, 0.0);
        let mut skewed = observation(0.07, 0.07);
        skewed.outer_lips = lip_points(0.03, 0.08);

        let natural = analyzer.analyze(&symmetric);
        let lopsided = analyzer.analyze(&skewed);
        assert!(lopsided.smile.naturalness < natural.smile.naturalness);
    }

    #[test]
    fn short_lip_contour_degrades_to_neutral() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.outer_lips.truncate(5);

        let quality = analyzer.analyze(&obs);
        assert!((quality.smile.intensity - 0.5).abs() < f32::EPSILON);
        assert!((quality.smile.naturalness - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_pose_defaults_to_frontal() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.pitch = None;
        obs.yaw = None;
        obs.roll = None;

        let quality = analyzer.analyze(&obs);
        assert!(quality.angle.is_optimal());
    }

    #[test]
    fn turned_head_flags_unflattering_angle() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.yaw = Some(35.0);

        let quality = analyzer.analyze(&obs);
        assert!(quality.issues.contains(&FaceIssue::UnflatteringAngle));
    }

    #[test]
    fn blur_outranks_expression_but_not_eyes() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.002, 0.002);
        obs.sharpness = Some(0.2);

        let quality = analyzer.analyze(&obs);
        // Both issues present; eyes-closed wins the severity ordering.
        assert!(quality.issues.contains(&FaceIssue::BlurredFace));
        assert_eq!(quality.primary_issue(), Some(FaceIssue::EyesClosed));
    }

    #[test]
    fn rank_stays_in_unit_interval() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.capture_quality = 5.0;
        obs.sharpness = Some(-2.0);

        let quality = analyzer.analyze(&obs);
        assert!((0.0..=1.0).contains(&quality.rank));
        assert!((0.0..=1.0).contains(&quality.capture_quality));
        assert!((0.0..=1.0).contains(&quality.sharpness));
    }

    #[test]
    fn rank_formula_matches_weights() {
        let analyzer = FaceQualityAnalyzer::default();
        let quality = analyzer.analyze(&observation(0.07, 0.07));

        let expected = 0.3 * quality.capture_quality
            + 0.25
            + 0.2 * quality.smile.overall()
            + 0.15 * quality.sharpness
            + 0.1;
        assert!((quality.rank - expected).abs() < 1e-6);
    }

    #[test]
    fn low_capture_quality_is_awkward_pose() {
        let analyzer = FaceQualityAnalyzer::default();
        let mut obs = observation(0.07, 0.07);
        obs.capture_quality = 0.3;

        let quality = analyzer.analyze(&obs);
        assert!(quality.issues.contains(&FaceIssue::AwkwardPose));
    }
}
