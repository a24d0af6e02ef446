//! Writer for synthetic pen data streams.
//!
//! Produces byte-exact files in any supported format. Used to build fixtures
//! and to re-emit extracted ink in a normalised layout.

use bytes::{BufMut, BytesMut};

use super::legacy::{BLOCK_HEADER_LEN, END_MARKER};
use crate::format::tag::{DOT, PAGE_INFO, PEN_DOWN, PEN_UP, SESSION_INFO};
use crate::format::{DotLayout, FormatSpec, FormatVersion, FrameRule, PrefixWidth};
use crate::ink::{PageId, RawDot};

/// Builds a pen data stream record by record.
///
/// Dots are given with absolute timestamps; formats with a delta clock get the
/// difference to the previous dot (or pen down), saturated to one byte.
pub struct StreamEncoder {
    spec: &'static FormatSpec,
    buf: BytesMut,
    last_time: u64,
}

impl StreamEncoder {
    pub fn new(version: FormatVersion) -> Self {
        Self {
            spec: version.spec(),
            buf: BytesMut::new(),
            last_time: 0,
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.spec.version
    }

    /// Frame `payload` under `tag` using the active table.
    pub fn record(mut self, tag: u8, payload: &[u8]) -> Self {
        self.put_record(tag, payload);
        self
    }

    /// Append bytes verbatim, bypassing framing.
    pub fn bytes(mut self, raw: &[u8]) -> Self {
        self.buf.put_slice(raw);
        self
    }

    /// Session header declaring `version_id`. Later records keep the framing
    /// of the encoder's own version.
    pub fn session_info(mut self, version_id: u8, device_id: u32) -> Self {
        let mut payload = Vec::with_capacity(5);
        payload.put_u8(version_id);
        payload.put_u32_le(device_id);
        self.buf.put_u8(SESSION_INFO);
        self.buf.put_slice(&payload);
        self
    }

    pub fn page_info(mut self, page: PageId) -> Self {
        let mut payload = Vec::with_capacity(12);
        payload.put_u32_le(page.owner_id);
        payload.put_u32_le(page.book_id);
        payload.put_u32_le(page.page_id);
        self.put_record(PAGE_INFO, &payload);
        self
    }

    pub fn pen_down(mut self, timestamp: u64) -> Self {
        self.last_time = timestamp;
        self.put_record(PEN_DOWN, &timestamp.to_le_bytes());
        self
    }

    pub fn pen_up(mut self, timestamp: u64) -> Self {
        self.put_record(PEN_UP, &timestamp.to_le_bytes());
        self
    }

    pub fn dot(mut self, dot: &RawDot) -> Self {
        let payload = self.dot_payload(dot);
        self.put_record(DOT, &payload);
        self
    }

    /// One headerless stroke block (legacy layout).
    pub fn legacy_stroke(mut self, time_start: u64, time_end: u64, dots: &[RawDot]) -> Self {
        self.buf.put_u8(0);
        self.buf.put_u8(0);
        self.buf.put_u64_le(time_start);
        self.buf.put_u64_le(time_end);
        self.buf.put_u32_le(dots.len() as u32);
        self.buf.put_u32_le(0);
        self.buf.put_u8(0);
        self.buf.put_u8(0);
        self.last_time = time_start;
        for dot in dots {
            let payload = self.compact_dot(dot);
            self.buf.put_slice(&payload);
        }
        self
    }

    /// Block that ends a legacy stroke list.
    pub fn legacy_terminator(mut self) -> Self {
        self.buf.put_u8(END_MARKER);
        self.buf.put_bytes(0, BLOCK_HEADER_LEN - 1);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    fn put_record(&mut self, tag: u8, payload: &[u8]) {
        self.buf.put_u8(tag);
        match self.spec.frame_or_fallback(tag) {
            FrameRule::Fixed(_) => {}
            FrameRule::Prefixed {
                width: PrefixWidth::U8,
                ..
            } => self.buf.put_u8(payload.len() as u8),
            FrameRule::Prefixed {
                width: PrefixWidth::U16,
                ..
            } => self.buf.put_u16_le(payload.len() as u16),
        }
        self.buf.put_slice(payload);
    }

    fn dot_payload(&mut self, dot: &RawDot) -> Vec<u8> {
        match self.spec.dot_layout {
            DotLayout::Compact => self.compact_dot(dot),
            DotLayout::Extended => {
                let mut payload = Vec::with_capacity(18);
                payload.put_u64_le(dot.timestamp);
                put_coordinates(&mut payload, dot);
                payload.put_u16_le(dot.pressure);
                let (tilt_x, tilt_y) = dot.tilt.unwrap_or((0, 0));
                payload.put_u8(tilt_x);
                payload.put_u8(tilt_y);
                self.last_time = dot.timestamp;
                payload
            }
        }
    }

    fn compact_dot(&mut self, dot: &RawDot) -> Vec<u8> {
        let delta = dot.timestamp.saturating_sub(self.last_time).min(u8::MAX as u64) as u8;
        self.last_time = dot.timestamp;
        let mut payload = Vec::with_capacity(8);
        payload.put_u8(delta);
        put_coordinates(&mut payload, dot);
        payload.put_u8(dot.pressure.min(u8::MAX as u16) as u8);
        payload
    }
}

/// Integer parts first, then both hundredths fractions.
fn put_coordinates(payload: &mut Vec<u8>, dot: &RawDot) {
    payload.put_u16_le((dot.x / 100).min(u16::MAX as u32) as u16);
    payload.put_u16_le((dot.y / 100).min(u16::MAX as u32) as u16);
    payload.put_u8((dot.x % 100) as u8);
    payload.put_u8((dot.y % 100) as u8);
}
