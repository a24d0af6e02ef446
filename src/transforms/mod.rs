//! Stroke cleanup transforms.
//!
//! Transforms run on mapped strokes after a page is sealed and mapped. Each
//! one mutates the dot list of a stroke in place and may shorten it, but never
//! empties a non-empty stroke.
//!
//! # Module Structure
//!
//! - [`outliers`] - Pulls single-dot spikes back between their neighbours
//! - [`dedupe`] - Collapses consecutive dots at the same position

pub mod dedupe;
pub mod outliers;

pub use dedupe::MergeDuplicateDots;
pub use outliers::RemoveOutliers;

use crate::config::CleanupConfig;
use crate::ink::{Dot, Page};

/// In-place rewrite of the dots of one stroke.
pub trait StrokeTransform {
    fn transform(&mut self, dots: &mut Vec<Dot>);
}

/// The enabled transforms, in the order they run.
pub fn from_config(config: &CleanupConfig) -> Vec<Box<dyn StrokeTransform + Send>> {
    let mut transforms: Vec<Box<dyn StrokeTransform + Send>> = Vec::new();
    if config.remove_outliers {
        transforms.push(Box::new(RemoveOutliers::new(config.outlier_distance_mm)));
    }
    if config.merge_duplicate_dots {
        transforms.push(Box::new(MergeDuplicateDots::new()));
    }
    transforms
}

/// Run every transform over every stroke of `pages`.
pub fn apply_transforms(pages: &mut [Page], transforms: &mut [Box<dyn StrokeTransform + Send>]) {
    if transforms.is_empty() {
        return;
    }
    for stroke in pages.iter_mut().flat_map(|page| page.strokes.iter_mut()) {
        for transform in transforms.iter_mut() {
            transform.transform(&mut stroke.dots);
        }
    }
}
