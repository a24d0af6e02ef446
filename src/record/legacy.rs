//! Headerless stroke-block layout written by early pen firmware.
//!
//! ```text
//! | marker u8 | kind u8 | time_start u64 | time_end u64 | dot_count u32 | reserved u32 | u8 | u8 |
//! | dot (8 bytes) | * dot_count
//! ```
//!
//! Blocks carry no tags. Each block is replayed as PenDown, `dot_count` Dots and
//! PenUp, with payloads borrowed from the block so the decoder handles them like
//! v1 records.

use bytes::Buf;

use super::RawRecord;
use crate::error::ReadError;
use crate::format::tag::{DOT, PEN_DOWN, PEN_UP};
use crate::format::FormatVersion;

pub(crate) const BLOCK_HEADER_LEN: usize = 28;
pub(crate) const DOT_LEN: usize = 8;
/// Block marker of a non-stroke block; ends the stroke list
pub(crate) const END_MARKER: u8 = 0x31;

const TIME_START: std::ops::Range<usize> = 2..10;
const TIME_END: std::ops::Range<usize> = 10..18;
const DOT_COUNT: std::ops::Range<usize> = 18..22;

#[derive(Debug)]
pub(super) enum LegacyBlocks<'a> {
    AtHeader,
    InDots {
        header_offset: usize,
        remaining: u32,
        time_end: &'a [u8],
    },
    Finished,
}

impl<'a> LegacyBlocks<'a> {
    pub(super) fn new() -> Self {
        LegacyBlocks::AtHeader
    }

    pub(super) fn next_record(
        &mut self,
        data: &'a [u8],
        pos: &mut usize,
    ) -> Option<Result<RawRecord<'a>, ReadError>> {
        match *self {
            LegacyBlocks::Finished => None,
            LegacyBlocks::AtHeader => {
                let offset = *pos;
                let available = data.len().saturating_sub(offset);
                if available == 0 {
                    *self = LegacyBlocks::Finished;
                    return None;
                }
                if available < BLOCK_HEADER_LEN {
                    return Some(Err(ReadError::TruncatedRecord {
                        offset,
                        tag: PEN_DOWN,
                        needed: BLOCK_HEADER_LEN,
                        available,
                        trailing: true,
                    }));
                }
                let header = &data[offset..offset + BLOCK_HEADER_LEN];
                let dot_count = (&header[DOT_COUNT]).get_u32_le();
                if dot_count == 0 || header[0] == END_MARKER {
                    tracing::trace!(offset, marker = header[0], "End of legacy stroke blocks");
                    *self = LegacyBlocks::Finished;
                    return None;
                }

                *pos = offset + BLOCK_HEADER_LEN;
                *self = LegacyBlocks::InDots {
                    header_offset: offset,
                    remaining: dot_count,
                    time_end: &header[TIME_END],
                };
                Some(Ok(RawRecord {
                    offset,
                    tag: PEN_DOWN,
                    payload: &header[TIME_START],
                    format: FormatVersion::Legacy,
                }))
            }
            LegacyBlocks::InDots {
                header_offset,
                remaining,
                time_end,
            } => {
                if remaining == 0 {
                    *self = LegacyBlocks::AtHeader;
                    return Some(Ok(RawRecord {
                        offset: header_offset,
                        tag: PEN_UP,
                        payload: time_end,
                        format: FormatVersion::Legacy,
                    }));
                }

                let offset = *pos;
                let available = data.len().saturating_sub(offset);
                if available < DOT_LEN {
                    return Some(Err(ReadError::TruncatedRecord {
                        offset,
                        tag: DOT,
                        needed: DOT_LEN,
                        available,
                        trailing: true,
                    }));
                }
                *pos = offset + DOT_LEN;
                *self = LegacyBlocks::InDots {
                    header_offset,
                    remaining: remaining - 1,
                    time_end,
                };
                Some(Ok(RawRecord {
                    offset,
                    tag: DOT,
                    payload: &data[offset..offset + DOT_LEN],
                    format: FormatVersion::Legacy,
                }))
            }
        }
    }
}
