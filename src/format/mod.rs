//! Pen data format versions and their frame tables.
//!
//! Every supported firmware revision is described by one [`FormatSpec`]: how
//! each record tag is framed, which field limits apply to dots, and the scale
//! table that turns raw device units into millimetres. Supporting a new pen
//! model means adding a table here, not touching the reader or decoder.
//!
//! # Tags
//!
//! ```text
//! 0x01 SessionInfo   version u8, device_id u32      (same frame in every version)
//! 0x02 PageInfo      owner u32, book u32, page u32
//! 0x03 PenDown       timestamp u64
//! 0x04 Dot           version specific, see DotLayout
//! 0x05 PenUp         timestamp u64
//! ```
//!
//! Any other tag is framed with the table's fallback rule and decoded as
//! `Unknown`.

mod tables;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use tables::{LEGACY, V1, V2};

/// Record tag bytes shared by all tagged formats.
pub mod tag {
    pub const SESSION_INFO: u8 = 0x01;
    pub const PAGE_INFO: u8 = 0x02;
    pub const PEN_DOWN: u8 = 0x03;
    pub const DOT: u8 = 0x04;
    pub const PEN_UP: u8 = 0x05;
}

/// Payload length of a SessionInfo record, identical across versions.
pub const SESSION_INFO_LEN: usize = 5;

/// Data format revision of a pen storage file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FormatVersion {
    /// Headerless stroke-block layout of early firmware (no tags)
    Legacy,
    /// Fixed frames, delta dot clock, 8-bit pressure
    V1,
    /// Length-prefixed frames, absolute dot clock, 10-bit pressure, tilt
    V2,
}

impl FormatVersion {
    /// All versions this build understands, oldest first.
    pub const ALL: [FormatVersion; 3] = [FormatVersion::Legacy, FormatVersion::V1, FormatVersion::V2];

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(FormatVersion::Legacy),
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            FormatVersion::Legacy => 0,
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
        }
    }

    /// Frame table, limits and scale for this version.
    pub fn spec(&self) -> &'static FormatSpec {
        match self {
            FormatVersion::Legacy => &LEGACY,
            FormatVersion::V1 => &V1,
            FormatVersion::V2 => &V2,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::Legacy => write!(f, "0 (legacy)"),
            other => write!(f, "{}", other.id()),
        }
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> Self {
        version.id()
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        FormatVersion::from_id(id).ok_or_else(|| format!("unsupported format version {}", id))
    }
}

/// Width of the little-endian length field of a prefixed frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefixWidth {
    U8,
    U16,
}

impl PrefixWidth {
    pub fn len(&self) -> usize {
        match self {
            PrefixWidth::U8 => 1,
            PrefixWidth::U16 => 2,
        }
    }
}

/// How the payload following a tag byte is delimited
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameRule {
    /// Exactly this many payload bytes
    Fixed(usize),
    /// Length field, then that many payload bytes (at least `min`)
    Prefixed { width: PrefixWidth, min: usize },
}

/// Byte layout of a Dot payload
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DotLayout {
    /// `dt u8, x u16, y u16, fx u8, fy u8, pressure u8` with a delta clock
    Compact,
    /// `timestamp u64, x u16, y u16, fx u8, fy u8, pressure u16, tilt_x u8, tilt_y u8`
    Extended,
}

impl DotLayout {
    /// Minimum payload length the decoder needs.
    pub fn payload_len(&self) -> usize {
        match self {
            DotLayout::Compact => 8,
            DotLayout::Extended => 18,
        }
    }
}

/// Valid ranges of raw dot fields
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldLimits {
    pub pressure_max: u16,
    /// Largest valid hundredths fraction of a coordinate
    pub fraction_max: u8,
}

/// Scale factors from raw device units to real units
///
/// Coordinates map to millimetres, pressure to `[0.0, 1.0]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    /// Millimetres per raw x unit
    pub x_scale: f64,
    /// Millimetres per raw y unit
    pub y_scale: f64,
    /// Raw pressure value that maps to 1.0
    pub pressure_max: f64,
}

/// Everything the reader, decoder and mapper need to know about one version
#[derive(Debug)]
pub struct FormatSpec {
    pub version: FormatVersion,
    /// Frame rule per known tag
    pub frames: &'static [(u8, FrameRule)],
    /// Frame rule for tags missing from `frames`
    pub fallback: FrameRule,
    pub dot_layout: DotLayout,
    pub limits: FieldLimits,
    pub scale: ScaleTable,
}

impl FormatSpec {
    /// Frame rule for a known tag, `None` for tags this version doesn't define.
    pub fn frame(&self, tag: u8) -> Option<FrameRule> {
        self.frames
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, rule)| *rule)
    }

    pub fn is_known(&self, tag: u8) -> bool {
        self.frame(tag).is_some()
    }

    /// Frame rule to use for `tag`, falling back for unknown tags.
    pub fn frame_or_fallback(&self, tag: u8) -> FrameRule {
        self.frame(tag).unwrap_or(self.fallback)
    }
}
