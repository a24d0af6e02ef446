//! Non-fatal extraction diagnostics.

use std::fmt;

use serde::Serialize;

use crate::ink::PageId;

/// Which dot field a clamped value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotField {
    XFraction,
    YFraction,
    Pressure,
}

impl DotField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::XFraction => "x fraction",
            Self::YFraction => "y fraction",
            Self::Pressure => "pressure",
        }
    }
}

/// A raw field value replaced by the nearest valid bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClampedValue {
    pub field: DotField,
    pub raw: u32,
    pub clamped: u32,
}

/// What went wrong, without where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Page identity changed while a stroke was open
    ImplicitStrokeClose { from: PageId, to: PageId },
    /// Pen down while a stroke was already open
    NestedPenDown,
    /// Dot outside any pen-down/pen-up bracket; the dot was dropped
    DotWithoutStroke,
    /// Pen up without an open stroke
    UnmatchedPenUp,
    /// Stroke sealed with no dots; it was dropped
    EmptyStrokeDiscarded,
    /// Page sealed with no strokes; it was dropped
    EmptyPageDiscarded { page: PageId },
    /// Out-of-range dot field clamped during decoding
    ValueClamped(ClampedValue),
    /// Dot clock went backwards; the previous timestamp was kept
    NonMonotonicTimestamp { previous: u64, found: u64 },
    /// The file ends inside a record; the partial record was dropped
    TruncatedRecord { tag: u8, needed: usize, available: usize },
    /// Tag not defined by the active format; the record was skipped
    UnknownTag { tag: u8, len: usize },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplicitStrokeClose { from, to } => {
                write!(f, "stroke closed by page change {} -> {}", from, to)
            }
            Self::NestedPenDown => write!(f, "pen down while a stroke is open"),
            Self::DotWithoutStroke => write!(f, "dot outside a stroke dropped"),
            Self::UnmatchedPenUp => write!(f, "pen up without pen down"),
            Self::EmptyStrokeDiscarded => write!(f, "stroke without dots discarded"),
            Self::EmptyPageDiscarded { page } => {
                write!(f, "page {} without strokes discarded", page)
            }
            Self::ValueClamped(value) => write!(
                f,
                "{} {} clamped to {}",
                value.field.name(),
                value.raw,
                value.clamped
            ),
            Self::NonMonotonicTimestamp { previous, found } => write!(
                f,
                "dot timestamp {} earlier than {}, kept {}",
                found, previous, previous
            ),
            Self::TruncatedRecord {
                tag,
                needed,
                available,
            } => write!(
                f,
                "partial record 0x{:02x} at end of file dropped ({} of {} bytes)",
                tag, available, needed
            ),
            Self::UnknownTag { tag, len } => {
                write!(f, "unknown record 0x{:02x} ({} bytes) skipped", tag, len)
            }
        }
    }
}

/// A non-fatal issue found while extracting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Identifier of the input file
    pub source: String,
    /// Byte offset of the record that caused it, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl Warning {
    /// Warning caused by the record at `offset`.
    pub fn at(offset: usize, kind: WarningKind) -> Self {
        Self {
            source: String::new(),
            offset: Some(offset),
            kind,
        }
    }

    /// Warning raised at end of stream.
    pub fn at_end(kind: WarningKind) -> Self {
        Self {
            source: String::new(),
            offset: None,
            kind,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}@{}: {}", self.source, offset, self.kind),
            None => write!(f, "{}: {}", self.source, self.kind),
        }
    }
}
