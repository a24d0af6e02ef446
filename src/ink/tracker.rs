//! Context state machine over decoded records.
//!
//! The tracker is the only place that decides what a record means given what
//! came before it. It has two named states and one rule per (state, record)
//! pair:
//!
//! | record                 | `Idle`                                    | `Drawing`                                   |
//! |------------------------|-------------------------------------------|---------------------------------------------|
//! | SessionInfo            | remember version and device               | same, stroke stays open                     |
//! | PageInfo (same page)   | no-op                                     | no-op                                       |
//! | PageInfo (new page)    | seal page, switch identity                | `ImplicitStrokeClose`, apply policy         |
//! | PenDown                | open stroke (and page) -> `Drawing`       | `NestedPenDown`, ignored                    |
//! | Dot                    | `DotWithoutStroke`, dropped               | append                                      |
//! | PenUp                  | `UnmatchedPenUp`, ignored                 | seal stroke -> `Idle`                       |
//! | Unknown                | `UnknownTag`                              | `UnknownTag`                                |
//! | end of stream          | seal page                                 | seal stroke, seal page                      |
//!
//! Pages are opened lazily by the first PenDown after an identity change, so
//! page information that is never written on produces no page at all.

use serde::{Deserialize, Serialize};

use super::assembler::{StrokeAssembler, StrokeSeal};
use super::{PageId, RawDot, RawPage};
use crate::error::ExtractError;
use crate::format::FormatVersion;
use crate::record::{Decoded, DecodedRecord, DotClock};
use crate::warning::{Warning, WarningKind};

/// Whether a stroke is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Drawing,
}

/// What to do with an open stroke when the page identity changes under it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageChangePolicy {
    /// Seal the stroke on the old page; dots until the next pen down are dropped
    #[default]
    Seal,
    /// Seal the stroke on the old page and continue it on the new page
    Split,
}

/// Folds decoded records of one file into sealed pages.
#[derive(Debug)]
pub struct ContextTracker {
    state: TrackerState,
    page: Option<PageId>,
    session: Option<(u8, u32)>,
    require_page_context: bool,
    policy: PageChangePolicy,
    assembler: StrokeAssembler,
    warnings: Vec<Warning>,
}

impl ContextTracker {
    pub fn new(require_page_context: bool, policy: PageChangePolicy) -> Self {
        Self {
            state: TrackerState::Idle,
            page: None,
            session: None,
            require_page_context,
            policy,
            assembler: StrokeAssembler::new(),
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Current page identity, if any page information has been seen.
    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    /// Format version and device id declared by the last session record.
    pub fn session(&self) -> Option<(u8, u32)> {
        self.session
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Record a warning raised outside the tracker, keeping stream order.
    pub fn report(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Seed the page identity before the first record, as if a PageInfo
    /// record had been read.
    pub fn seed_page(&mut self, id: PageId) {
        self.change_page(None, id);
    }

    /// Apply one decoded record.
    pub fn apply(&mut self, decoded: &Decoded) -> Result<(), ExtractError> {
        let offset = decoded.offset;
        for clamped in &decoded.clamped {
            self.warn(Some(offset), WarningKind::ValueClamped(*clamped));
        }

        match &decoded.record {
            DecodedRecord::SessionInfo {
                format_version,
                device_id,
            } => {
                tracing::debug!(
                    offset,
                    format_version,
                    device_id,
                    "Session information"
                );
                self.session = Some((*format_version, *device_id));
            }
            DecodedRecord::PageInfo {
                owner_id,
                book_id,
                page_id,
            } => {
                self.change_page(Some(offset), PageId::new(*owner_id, *book_id, *page_id));
            }
            DecodedRecord::PenDown { timestamp } => {
                self.pen_down(offset, decoded.format, *timestamp)?;
            }
            DecodedRecord::Dot {
                x,
                y,
                pressure,
                tilt,
                clock,
            } => self.dot(offset, *x, *y, *pressure, *tilt, *clock),
            DecodedRecord::PenUp { timestamp } => match self.state {
                TrackerState::Idle => self.warn(Some(offset), WarningKind::UnmatchedPenUp),
                TrackerState::Drawing => self.seal_stroke(Some(offset), Some(*timestamp)),
            },
            DecodedRecord::Unknown { tag, payload } => {
                tracing::trace!(offset, tag, len = payload.len(), "Skipping unknown record");
                self.warn(
                    Some(offset),
                    WarningKind::UnknownTag {
                        tag: *tag,
                        len: payload.len(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Close everything still open and hand back pages and warnings.
    pub fn finish(mut self) -> (Vec<RawPage>, Vec<Warning>) {
        if self.state == TrackerState::Drawing {
            self.seal_stroke(None, None);
        }
        self.seal_page(None);
        (self.assembler.into_pages(), self.warnings)
    }

    fn warn(&mut self, offset: Option<usize>, kind: WarningKind) {
        let warning = match offset {
            Some(offset) => Warning::at(offset, kind),
            None => Warning::at_end(kind),
        };
        self.warnings.push(warning);
    }

    fn change_page(&mut self, offset: Option<usize>, id: PageId) {
        let current = self.assembler.page_id().or(self.page);
        self.page = Some(id);
        if current == Some(id) {
            return;
        }

        if self.state == TrackerState::Idle {
            self.seal_page(offset);
            return;
        }

        let from = current.unwrap_or(PageId::UNKNOWN);
        self.warn(offset, WarningKind::ImplicitStrokeClose { from, to: id });

        // The open stroke belongs to the page it started on.
        let resume = self.assembler.stroke_clock();
        let format = self.assembler.stroke_format();
        self.seal_stroke(offset, None);
        self.seal_page(offset);

        if self.policy == PageChangePolicy::Split {
            if let (Some(start), Some(format)) = (resume, format) {
                self.assembler.open_page(id);
                self.assembler.open_stroke(format, start);
                self.state = TrackerState::Drawing;
            }
        }
    }

    fn pen_down(
        &mut self,
        offset: usize,
        format: FormatVersion,
        timestamp: u64,
    ) -> Result<(), ExtractError> {
        if self.state == TrackerState::Drawing {
            self.warn(Some(offset), WarningKind::NestedPenDown);
            return Ok(());
        }

        if self.assembler.page_id().is_none() {
            let id = match self.page {
                Some(id) => id,
                None if self.require_page_context => {
                    return Err(ExtractError::MissingPageContext { offset });
                }
                None => PageId::UNKNOWN,
            };
            self.assembler.open_page(id);
        }

        self.assembler.open_stroke(format, timestamp);
        self.state = TrackerState::Drawing;
        Ok(())
    }

    fn dot(
        &mut self,
        offset: usize,
        x: u32,
        y: u32,
        pressure: u16,
        tilt: Option<(u8, u8)>,
        clock: DotClock,
    ) {
        let Some(base) = self.assembler.stroke_clock() else {
            self.warn(Some(offset), WarningKind::DotWithoutStroke);
            return;
        };

        let timestamp = match clock {
            // a corrupt start time must not wrap the clock
            DotClock::Delta(delta) => base.saturating_add(u64::from(delta)),
            DotClock::Absolute(found) => match self.assembler.last_dot_time() {
                Some(previous) if found < previous => {
                    self.warn(
                        Some(offset),
                        WarningKind::NonMonotonicTimestamp { previous, found },
                    );
                    previous
                }
                _ => found,
            },
        };

        self.assembler.push_dot(RawDot {
            x,
            y,
            pressure,
            tilt,
            timestamp,
        });
    }

    fn seal_stroke(&mut self, offset: Option<usize>, end_time: Option<u64>) {
        self.state = TrackerState::Idle;
        if self.assembler.seal_stroke(end_time) == StrokeSeal::Discarded {
            tracing::trace!(?offset, "Dropping stroke without dots");
            self.warn(offset, WarningKind::EmptyStrokeDiscarded);
        }
    }

    fn seal_page(&mut self, offset: Option<usize>) {
        if let Some(page) = self.assembler.seal_page() {
            self.warn(offset, WarningKind::EmptyPageDiscarded { page });
        }
    }
}
