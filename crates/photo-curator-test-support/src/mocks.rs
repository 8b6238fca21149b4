//! Mock implementations of the core port traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use photo_curator_core::domain::{PersonFaceReplacement, PersonId, Photo, PhotoId};
use photo_curator_core::pipeline::PhotoInput;
use photo_curator_core::ports::{
    CollectionSource, CompositeError, CompositeHandle, Compositor, PersonMatcher, ProgressEvent,
    ProgressSink,
};

/// Mock implementation of `CollectionSource` yielding pre-built inputs.
pub struct MockCollectionSource {
    inputs: Vec<PhotoInput>,
}

impl MockCollectionSource {
    /// Creates a source with the given inputs.
    #[must_use]
    pub fn new(inputs: Vec<PhotoInput>) -> Self {
        Self { inputs }
    }

    /// Creates an empty source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl CollectionSource for MockCollectionSource {
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoInput>> + Send + '_> {
        Box::new(self.inputs.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.inputs.len())
    }
}

/// Mock `PersonMatcher` backed by an explicit per-photo assignment
/// table.
#[derive(Default)]
pub struct MockPersonMatcher {
    assignments: HashMap<PhotoId, Vec<Option<PersonId>>>,
    fail: bool,
}

impl MockPersonMatcher {
    /// Creates an empty matcher; unknown photos identify to no faces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns one person per face, in face order.
    pub fn assign(&mut self, photo: &Photo, people: &[&str]) {
        self.assignments.insert(
            photo.id,
            people.iter().map(|p| Some(PersonId::new(*p))).collect(),
        );
    }

    /// Marks a face as unidentifiable.
    pub fn assign_unknown(&mut self, photo: &Photo, face_count: usize) {
        self.assignments.insert(photo.id, vec![None; face_count]);
    }

    /// Makes every call fail, simulating a broken identity backend.
    pub fn fail_all(&mut self) {
        self.fail = true;
    }
}

impl PersonMatcher for MockPersonMatcher {
    fn identify(&self, photo: &Photo) -> anyhow::Result<Vec<Option<PersonId>>> {
        if self.fail {
            anyhow::bail!("identity backend unavailable");
        }
        Ok(self.assignments.get(&photo.id).cloned().unwrap_or_default())
    }
}

/// Mock `Compositor` that records requests and succeeds or fails on
/// command.
pub struct MockCompositor {
    requests: Arc<Mutex<Vec<PersonFaceReplacement>>>,
    failure: Option<CompositeError>,
}

impl MockCompositor {
    /// A compositor that always succeeds.
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A compositor that always fails with the given error.
    #[must_use]
    pub fn failing(error: CompositeError) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Some(error),
        }
    }

    /// All replacements the compositor was asked to apply.
    #[must_use]
    pub fn requests(&self) -> Vec<PersonFaceReplacement> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Compositor for MockCompositor {
    fn composite(
        &self,
        base: &Photo,
        replacement: &PersonFaceReplacement,
    ) -> Result<CompositeHandle, CompositeError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(replacement.clone());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(CompositeHandle(format!(
                "composite://{}/{}",
                base.id, replacement.person
            ))),
        }
    }
}

/// Mock `ProgressSink` capturing events for assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `Scored` events.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Scored { .. }))
            .count()
    }

    /// Final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                scored,
                skipped,
                clusters,
            } => Some((*scored, *skipped, *clusters)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
