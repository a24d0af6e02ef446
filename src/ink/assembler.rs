//! Stroke and page accumulation.
//!
//! The assembler owns the open stroke, the open page and every sealed page.
//! It enforces the output invariants: sealed strokes have at least one dot,
//! sealed pages have at least one stroke, and both keep the order in which
//! they were opened. The [`ContextTracker`](super::ContextTracker) decides
//! *when* to open and seal; the assembler decides what survives.

use super::{PageId, RawDot, RawPage, RawStroke};
use crate::format::FormatVersion;

/// Outcome of sealing the open stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeSeal {
    /// Stroke appended to the open page
    Kept,
    /// Stroke had no dots and was dropped
    Discarded,
    /// No stroke was open
    NothingOpen,
}

#[derive(Debug, Default)]
pub struct StrokeAssembler {
    sealed: Vec<RawPage>,
    page: Option<RawPage>,
    stroke: Option<RawStroke>,
}

impl StrokeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the open page.
    pub fn page_id(&self) -> Option<PageId> {
        self.page.as_ref().map(|page| page.id)
    }

    /// Format the open stroke was started under.
    pub fn stroke_format(&self) -> Option<FormatVersion> {
        self.stroke.as_ref().map(|stroke| stroke.format)
    }

    /// Timestamp of the last dot of the open stroke, or its start time.
    pub fn stroke_clock(&self) -> Option<u64> {
        self.stroke.as_ref().map(|stroke| {
            stroke
                .dots
                .last()
                .map_or(stroke.start_time, |dot| dot.timestamp)
        })
    }

    /// Timestamp of the last dot of the open stroke.
    pub fn last_dot_time(&self) -> Option<u64> {
        self.stroke
            .as_ref()
            .and_then(|stroke| stroke.dots.last())
            .map(|dot| dot.timestamp)
    }

    /// Start a new page. The open page, if any, must be sealed first.
    pub fn open_page(&mut self, id: PageId) {
        debug_assert!(self.page.is_none(), "open page not sealed");
        self.page = Some(RawPage {
            id,
            strokes: Vec::new(),
        });
    }

    /// Start a stroke on the open page.
    pub fn open_stroke(&mut self, format: FormatVersion, start_time: u64) {
        debug_assert!(self.page.is_some(), "stroke opened without a page");
        self.stroke = Some(RawStroke {
            format,
            start_time,
            end_time: start_time,
            dots: Vec::new(),
        });
    }

    /// Append a dot to the open stroke. Returns false when no stroke is open.
    pub fn push_dot(&mut self, dot: RawDot) -> bool {
        match self.stroke.as_mut() {
            Some(stroke) => {
                stroke.dots.push(dot);
                true
            }
            None => false,
        }
    }

    /// Seal the open stroke at `end_time` (last dot time when `None`).
    pub fn seal_stroke(&mut self, end_time: Option<u64>) -> StrokeSeal {
        let Some(mut stroke) = self.stroke.take() else {
            return StrokeSeal::NothingOpen;
        };
        if stroke.dots.is_empty() {
            return StrokeSeal::Discarded;
        }
        let last = stroke.dots.last().map_or(stroke.start_time, |dot| dot.timestamp);
        stroke.end_time = end_time.unwrap_or(last).max(last);
        match self.page.as_mut() {
            Some(page) => {
                page.strokes.push(stroke);
                StrokeSeal::Kept
            }
            None => StrokeSeal::Discarded,
        }
    }

    /// Seal the open page. Returns the identity of a page dropped for having
    /// no strokes.
    pub fn seal_page(&mut self) -> Option<PageId> {
        let page = self.page.take()?;
        if page.strokes.is_empty() {
            return Some(page.id);
        }
        self.sealed.push(page);
        None
    }

    /// Consume the assembler. Open strokes and pages must be sealed first.
    pub fn into_pages(self) -> Vec<RawPage> {
        debug_assert!(self.stroke.is_none() && self.page.is_none());
        self.sealed
    }
}
