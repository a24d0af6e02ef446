//! Typed interpretation of framed records.

use bytes::Buf;

use super::{DecodedRecord, DotClock, RawRecord};
use crate::error::DecodeError;
use crate::format::tag::{DOT, PAGE_INFO, PEN_DOWN, PEN_UP, SESSION_INFO};
use crate::format::{DotLayout, FieldLimits, FormatVersion, SESSION_INFO_LEN};
use crate::warning::{ClampedValue, DotField};

/// A decoded record plus what the decoder had to fix on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub offset: usize,
    pub format: FormatVersion,
    pub record: DecodedRecord,
    /// Out-of-range fields replaced by their bound
    pub clamped: Vec<ClampedValue>,
}

/// Decode one raw record according to the format it was framed with.
///
/// Tags the format doesn't define become [`DecodedRecord::Unknown`]. Only a
/// payload shorter than its type requires is an error.
pub fn decode(raw: &RawRecord<'_>) -> Result<Decoded, DecodeError> {
    let spec = raw.format.spec();
    let mut clamped = Vec::new();

    let record = if !spec.is_known(raw.tag) {
        DecodedRecord::Unknown {
            tag: raw.tag,
            payload: raw.payload.to_vec(),
        }
    } else {
        match raw.tag {
            SESSION_INFO => {
                let mut buf = require(raw, SESSION_INFO_LEN)?;
                DecodedRecord::SessionInfo {
                    format_version: buf.get_u8(),
                    device_id: buf.get_u32_le(),
                }
            }
            PAGE_INFO => {
                let mut buf = require(raw, 12)?;
                DecodedRecord::PageInfo {
                    owner_id: buf.get_u32_le(),
                    book_id: buf.get_u32_le(),
                    page_id: buf.get_u32_le(),
                }
            }
            PEN_DOWN => DecodedRecord::PenDown {
                timestamp: require(raw, 8)?.get_u64_le(),
            },
            PEN_UP => DecodedRecord::PenUp {
                timestamp: require(raw, 8)?.get_u64_le(),
            },
            DOT => decode_dot(raw, spec.dot_layout, &spec.limits, &mut clamped)?,
            tag => DecodedRecord::Unknown {
                tag,
                payload: raw.payload.to_vec(),
            },
        }
    };

    Ok(Decoded {
        offset: raw.offset,
        format: raw.format,
        record,
        clamped,
    })
}

fn require<'a>(raw: &RawRecord<'a>, needed: usize) -> Result<&'a [u8], DecodeError> {
    if raw.payload.len() < needed {
        return Err(DecodeError::ShortPayload {
            tag: raw.tag,
            needed,
            available: raw.payload.len(),
        });
    }
    Ok(raw.payload)
}

fn decode_dot(
    raw: &RawRecord<'_>,
    layout: DotLayout,
    limits: &FieldLimits,
    clamped: &mut Vec<ClampedValue>,
) -> Result<DecodedRecord, DecodeError> {
    let mut buf = require(raw, layout.payload_len())?;

    let clock = match layout {
        DotLayout::Compact => DotClock::Delta(buf.get_u8()),
        DotLayout::Extended => DotClock::Absolute(buf.get_u64_le()),
    };
    let x_int = buf.get_u16_le() as u32;
    let y_int = buf.get_u16_le() as u32;
    let x_frac = clamp(DotField::XFraction, buf.get_u8() as u32, limits.fraction_max as u32, clamped);
    let y_frac = clamp(DotField::YFraction, buf.get_u8() as u32, limits.fraction_max as u32, clamped);
    let (pressure, tilt) = match layout {
        DotLayout::Compact => (buf.get_u8() as u32, None),
        DotLayout::Extended => {
            let pressure = buf.get_u16_le() as u32;
            (pressure, Some((buf.get_u8(), buf.get_u8())))
        }
    };
    let pressure = clamp(DotField::Pressure, pressure, limits.pressure_max as u32, clamped);

    Ok(DecodedRecord::Dot {
        x: x_int * 100 + x_frac,
        y: y_int * 100 + y_frac,
        pressure: pressure as u16,
        tilt,
        clock,
    })
}

fn clamp(field: DotField, raw: u32, max: u32, clamped: &mut Vec<ClampedValue>) -> u32 {
    if raw > max {
        clamped.push(ClampedValue {
            field,
            raw,
            clamped: max,
        });
        max
    } else {
        raw
    }
}
