//! Duplicate dot merging.
//!
//! A pen held still keeps reporting the same position. Runs of identical
//! positions collapse to one dot.

use super::StrokeTransform;
use crate::ink::Dot;

/// Collapses consecutive dots at the same position.
///
/// The merged dot keeps the timestamp and tilt of the first dot of the run
/// and the highest pressure seen in it.
pub struct MergeDuplicateDots {
    merged_count: usize,
}

impl MergeDuplicateDots {
    pub fn new() -> Self {
        Self { merged_count: 0 }
    }

    /// Number of dots removed so far.
    pub fn merged_count(&self) -> usize {
        self.merged_count
    }
}

impl Default for MergeDuplicateDots {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeTransform for MergeDuplicateDots {
    fn transform(&mut self, dots: &mut Vec<Dot>) {
        let before = dots.len();
        dots.dedup_by(|next, kept| {
            if next.x == kept.x && next.y == kept.y {
                kept.pressure = kept.pressure.max(next.pressure);
                true
            } else {
                false
            }
        });
        self.merged_count += before - dots.len();
    }
}
