//! Single-dot spike removal.
//!
//! The pen occasionally misreads one dot far away from an otherwise smooth
//! path. Such a dot is moved to the midpoint of its neighbours on the axis
//! where it jumps; the other axis, pressure and time are left alone.

use super::StrokeTransform;
use crate::ink::Dot;

/// Moves isolated spikes back between their neighbours.
///
/// A dot is a spike on an axis when it is more than `distance` away from both
/// neighbours while the neighbours are closer than `distance` to each other.
/// Dots are visited front to back and a corrected dot is what its successor
/// is compared against.
pub struct RemoveOutliers {
    distance: f64,
    moved_count: usize,
}

impl RemoveOutliers {
    /// Create a filter with the spike threshold in millimetres.
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            moved_count: 0,
        }
    }

    /// Number of coordinates moved so far.
    pub fn moved_count(&self) -> usize {
        self.moved_count
    }

    fn spike_midpoint(&self, prev: f64, value: f64, next: f64) -> Option<f64> {
        let to_prev = (value - prev).abs();
        let to_next = (value - next).abs();
        let between = (prev - next).abs();
        if to_prev > self.distance && to_next > self.distance && self.distance > between {
            Some((prev + next) / 2.0)
        } else {
            None
        }
    }
}

impl StrokeTransform for RemoveOutliers {
    fn transform(&mut self, dots: &mut Vec<Dot>) {
        for i in 1..dots.len().saturating_sub(1) {
            let (prev, next) = (dots[i - 1], dots[i + 1]);
            if let Some(x) = self.spike_midpoint(prev.x, dots[i].x, next.x) {
                dots[i].x = x;
                self.moved_count += 1;
            }
            if let Some(y) = self.spike_midpoint(prev.y, dots[i].y, next.y) {
                dots[i].y = y;
                self.moved_count += 1;
            }
        }
    }
}
