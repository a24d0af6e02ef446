//! Record framing and decoding.
//!
//! A pen storage file is a sequence of tagged records. The [`RecordReader`]
//! splits the bytes into [`RawRecord`] views without looking at payloads, and
//! [`decode`] turns each view into a [`DecodedRecord`].
//!
//! ```text
//! bytes --RecordReader--> RawRecord --decode--> DecodedRecord --> tracker
//! ```

mod decoder;
mod encoder;
mod legacy;
mod reader;

use crate::format::FormatVersion;

pub use decoder::{decode, Decoded};
pub use encoder::StreamEncoder;
pub use reader::RecordReader;

/// One framed record, borrowed from the file buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Byte offset of the tag (or block header) in the file
    pub offset: usize,
    pub tag: u8,
    pub payload: &'a [u8],
    /// Format active when the record was framed
    pub format: FormatVersion,
}

/// How a dot's time is expressed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotClock {
    /// Milliseconds since the previous dot (or pen down)
    Delta(u8),
    /// Device clock in milliseconds
    Absolute(u64),
}

/// A record interpreted according to the active format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRecord {
    SessionInfo {
        format_version: u8,
        device_id: u32,
    },
    PageInfo {
        owner_id: u32,
        book_id: u32,
        page_id: u32,
    },
    PenDown {
        timestamp: u64,
    },
    Dot {
        /// Hundredths of an Ncode unit
        x: u32,
        /// Hundredths of an Ncode unit
        y: u32,
        pressure: u16,
        tilt: Option<(u8, u8)>,
        clock: DotClock,
    },
    PenUp {
        timestamp: u64,
    },
    /// Tag the active format doesn't define, kept for diagnostics
    Unknown { tag: u8, payload: Vec<u8> },
}

impl DecodedRecord {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DecodedRecord::SessionInfo { .. } => "session_info",
            DecodedRecord::PageInfo { .. } => "page_info",
            DecodedRecord::PenDown { .. } => "pen_down",
            DecodedRecord::Dot { .. } => "dot",
            DecodedRecord::PenUp { .. } => "pen_up",
            DecodedRecord::Unknown { .. } => "unknown",
        }
    }
}
