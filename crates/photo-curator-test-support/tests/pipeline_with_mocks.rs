//! Drives the full pipeline through the port mocks: collection source
//! in, person matcher and progress sink during the run, compositor
//! consuming the planned replacements afterwards.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::AtomicBool;

use photo_curator_core::pipeline::{CurationPipeline, PhotoInput, PipelineConfig};
use photo_curator_core::planner::PlannerConfig;
use photo_curator_core::ports::{CollectionSource, CompositeError, Compositor, PersonMatcher};
use photo_curator_core::{PhotoType, TechnicalSignals};
use photo_curator_test_support::{
    FaceObservationBuilder, MockCollectionSource, MockCompositor, MockPersonMatcher,
    MockProgressSink, PhotoBuilder,
};

/// A two-frame burst where the technically stronger frame caught the
/// subject blinking.
fn blink_burst() -> (Vec<PhotoInput>, MockPersonMatcher) {
    let blink_photo = PhotoBuilder::at(0)
        .asset_ref("asset://blink")
        .hash_fingerprint(0xA0)
        .build();
    let open_photo = PhotoBuilder::at(2)
        .asset_ref("asset://open")
        .hash_fingerprint(0xA0)
        .build();

    let mut matcher = MockPersonMatcher::new();
    matcher.assign(&blink_photo, &["alice"]);
    matcher.assign(&open_photo, &["alice"]);

    let signals = |strength: f32| TechnicalSignals {
        sharpness: Some(strength),
        exposure: Some(strength),
        composition: Some(strength),
    };

    let inputs = vec![
        PhotoInput {
            photo: blink_photo,
            photo_type: PhotoType::Group,
            technical: signals(0.95),
            context: None,
            observations: vec![FaceObservationBuilder::frontal().eyes_closed().build()],
        },
        PhotoInput {
            photo: open_photo,
            photo_type: PhotoType::Group,
            technical: signals(0.3),
            context: None,
            observations: vec![FaceObservationBuilder::frontal().build()],
        },
    ];

    (inputs, matcher)
}

fn pipeline() -> CurationPipeline {
    CurationPipeline::new(PipelineConfig {
        planner: PlannerConfig {
            potential_floor: 0.2,
            ..PlannerConfig::default()
        },
        ..PipelineConfig::default()
    })
}

#[test]
fn pipeline_through_mocks_plans_and_composites() {
    let (inputs, matcher) = blink_burst();
    let source = MockCollectionSource::new(inputs);
    let sink = MockProgressSink::new();

    let inputs: Vec<PhotoInput> = source
        .photos()
        .collect::<anyhow::Result<Vec<_>>>()
        .expect("mock source yields clean inputs");
    assert_eq!(inputs.len(), source.count_hint().unwrap());

    let report = pipeline().run(
        inputs,
        Some(&matcher as &dyn PersonMatcher),
        &sink,
        &AtomicBool::new(false),
    );

    assert_eq!(sink.scored_count(), 2);
    // The summary event belongs to the caller, not the pipeline.
    assert_eq!(sink.finished_counts(), None);
    assert_eq!(report.photos.len(), 2);
    assert_eq!(report.clusters.len(), 1);

    let cluster_report = &report.clusters[0];
    let replacements = &cluster_report.plan.replacements;
    assert_eq!(replacements.len(), 1);
    assert!(replacements[0].is_feasible);

    // Hand the plan to the compositor the way a caller would.
    let base = report
        .photos
        .iter()
        .find(|p| p.id == cluster_report.curated.representative)
        .unwrap();
    let compositor = MockCompositor::succeeding();
    let handle = compositor
        .composite(base, &replacements[0])
        .expect("replacement composites");
    assert!(handle.0.starts_with("composite://"));
    assert_eq!(compositor.requests().len(), 1);
}

#[test]
fn compositor_failure_is_typed_and_isolated() {
    let (inputs, matcher) = blink_burst();
    let sink = MockProgressSink::new();

    let report = pipeline().run(
        inputs,
        Some(&matcher as &dyn PersonMatcher),
        &sink,
        &AtomicBool::new(false),
    );

    let cluster_report = &report.clusters[0];
    let base = report
        .photos
        .iter()
        .find(|p| p.id == cluster_report.curated.representative)
        .unwrap();

    let compositor =
        MockCompositor::failing(CompositeError::AlignmentFailed("landmark drift".into()));
    let result = compositor.composite(base, &cluster_report.plan.replacements[0]);
    assert!(matches!(result, Err(CompositeError::AlignmentFailed(_))));
    // The failed request was still recorded; the plan itself is intact.
    assert_eq!(compositor.requests().len(), 1);
    assert_eq!(cluster_report.plan.replacements.len(), 1);
}
