//! Person identity port.
//!
//! Identity assignment is an external capability; the planner only
//! consumes the mapping from detected faces to stable person ids.

use std::collections::BTreeSet;

use crate::domain::{PersonId, Photo};

/// Port assigning a stable `PersonId` to each detected face within a
/// cluster.
pub trait PersonMatcher: Send + Sync {
    /// Returns one entry per face in `photo.faces`, in order. `None`
    /// marks a face the matcher could not identify.
    ///
    /// # Errors
    ///
    /// Returns an error when the identity collaborator itself fails;
    /// the planner maps this to a processing-error outcome, never a
    /// panic.
    fn identify(&self, photo: &Photo) -> anyhow::Result<Vec<Option<PersonId>>>;

    /// Whether all photos depict the same set of people. The default
    /// implementation compares identified person sets across frames;
    /// any disagreement or unidentified face makes the answer `false`.
    ///
    /// # Errors
    ///
    /// Propagates `identify` failures.
    fn same_people(&self, photos: &[&Photo]) -> anyhow::Result<bool> {
        let mut reference: Option<BTreeSet<PersonId>> = None;
        for photo in photos {
            let assignments = self.identify(photo)?;
            if assignments.iter().any(Option::is_none) {
                return Ok(false);
            }
            let set: BTreeSet<PersonId> = assignments.into_iter().flatten().collect();
            match &reference {
                None => reference = Some(set),
                Some(expected) if *expected != set => return Ok(false),
                Some(_) => {}
            }
        }
        Ok(true)
    }
}
