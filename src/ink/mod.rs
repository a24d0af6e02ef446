//! Stroke geometry and the state machine that assembles it.
//!
//! Raw types ([`RawDot`], [`RawStroke`], [`RawPage`]) hold device units and are
//! what the tracker produces. The mapper turns them into [`Dot`], [`Stroke`]
//! and [`Page`] in millimetres, which is what callers get back.
//!
//! # Module Structure
//!
//! - [`tracker`] - Context state machine over decoded records
//! - [`assembler`] - Groups dots into strokes and strokes into pages
//! - [`mapper`] - Raw units to real units
//! - [`notebook`] - Known notebook dimensions

pub mod assembler;
pub mod mapper;
pub mod notebook;
pub mod tracker;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::FormatVersion;

pub use assembler::StrokeAssembler;
pub use mapper::{map_dot, map_page};
pub use notebook::Notebook;
pub use tracker::{ContextTracker, PageChangePolicy, TrackerState};

/// Identity of a writing surface.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId {
    pub owner_id: u32,
    pub book_id: u32,
    pub page_id: u32,
}

impl PageId {
    /// Sentinel identity for dots written before any page information.
    pub const UNKNOWN: PageId = PageId {
        owner_id: 0,
        book_id: 0,
        page_id: 0,
    };

    pub fn new(owner_id: u32, book_id: u32, page_id: u32) -> Self {
        Self {
            owner_id,
            book_id,
            page_id,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.owner_id, self.book_id, self.page_id)
    }
}

/// A sampled pen position in device units
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawDot {
    /// Hundredths of an Ncode unit
    pub x: u32,
    /// Hundredths of an Ncode unit
    pub y: u32,
    pub pressure: u16,
    pub tilt: Option<(u8, u8)>,
    /// Device clock in milliseconds
    pub timestamp: u64,
}

/// A sealed stroke in device units
#[derive(Debug, Clone, PartialEq)]
pub struct RawStroke {
    /// Format whose scale table applies to these dots
    pub format: FormatVersion,
    pub start_time: u64,
    pub end_time: u64,
    pub dots: Vec<RawDot>,
}

/// A sealed page in device units
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub id: PageId,
    pub strokes: Vec<RawStroke>,
}

/// A pen sample in real units
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Dot {
    /// Millimetres
    pub x: f64,
    /// Millimetres
    pub y: f64,
    /// Normalised to `[0.0, 1.0]`
    pub pressure: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<(u8, u8)>,
    /// Device clock in milliseconds
    pub timestamp: u64,
}

/// A pen-down to pen-up sequence of dots. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub start_time: u64,
    pub end_time: u64,
    pub dots: Vec<Dot>,
}

impl Stroke {
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Elapsed device time between pen down and pen up.
    pub fn duration_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// Strokes written on one identified surface. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: PageId,
    pub strokes: Vec<Stroke>,
}

impl Page {
    pub fn dot_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Paper properties of the notebook this page belongs to.
    pub fn notebook(&self) -> Notebook {
        Notebook::lookup(self.id.book_id)
    }
}
