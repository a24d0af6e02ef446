//! Lazy record framing over a file buffer.

use bytes::Buf;

use super::legacy::LegacyBlocks;
use super::RawRecord;
use crate::error::ReadError;
use crate::format::tag::SESSION_INFO;
use crate::format::{FormatSpec, FormatVersion, FrameRule, PrefixWidth, SESSION_INFO_LEN};

/// How the remaining bytes are framed
#[derive(Debug)]
enum Framing<'a> {
    /// Waiting for the leading SessionInfo record
    AwaitingSession,
    Tagged(&'static FormatSpec),
    Legacy(LegacyBlocks<'a>),
}

/// Splits a pen data buffer into [`RawRecord`]s.
///
/// The reader is an iterator; it stops after the first error. Reading the same
/// file again means constructing a new reader over the same bytes.
#[derive(Debug)]
pub struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
    framing: Framing<'a>,
    /// Set when the caller forces a version; SessionInfo can't switch it then
    forced: bool,
    done: bool,
}

impl<'a> RecordReader<'a> {
    /// Create a reader. Without `format_override` the buffer must start with a
    /// SessionInfo record declaring a supported version.
    pub fn new(data: &'a [u8], format_override: Option<FormatVersion>) -> Self {
        let framing = match format_override {
            None => Framing::AwaitingSession,
            Some(FormatVersion::Legacy) => Framing::Legacy(LegacyBlocks::new()),
            Some(version) => Framing::Tagged(version.spec()),
        };
        Self {
            data,
            pos: 0,
            framing,
            forced: format_override.is_some(),
            done: false,
        }
    }

    /// Format currently used for framing, `None` before the session header.
    pub fn format(&self) -> Option<FormatVersion> {
        match &self.framing {
            Framing::AwaitingSession => None,
            Framing::Tagged(spec) => Some(spec.version),
            Framing::Legacy(_) => Some(FormatVersion::Legacy),
        }
    }

    fn next_record(&mut self) -> Option<Result<RawRecord<'a>, ReadError>> {
        // Legacy blocks still owe a PenUp once the last dot is consumed
        if let Framing::Legacy(blocks) = &mut self.framing {
            return blocks.next_record(self.data, &mut self.pos);
        }
        if self.pos >= self.data.len() {
            return None;
        }
        match &mut self.framing {
            Framing::Legacy(_) => None,
            Framing::AwaitingSession => {
                if self.data[self.pos] != SESSION_INFO {
                    return Some(Err(ReadError::UnsupportedFormatVersion {
                        offset: self.pos,
                        version: None,
                    }));
                }
                self.next_tagged(FrameRule::Fixed(SESSION_INFO_LEN), None)
            }
            Framing::Tagged(spec) => {
                let spec: &'static FormatSpec = *spec;
                let rule = spec.frame_or_fallback(self.data[self.pos]);
                self.next_tagged(rule, Some(spec.version))
            }
        }
    }

    fn next_tagged(
        &mut self,
        rule: FrameRule,
        active: Option<FormatVersion>,
    ) -> Option<Result<RawRecord<'a>, ReadError>> {
        let offset = self.pos;
        let tag = self.data[offset];
        let rest = &self.data[offset + 1..];

        let (prefix_len, payload_len) = match rule {
            FrameRule::Fixed(len) => (0, len),
            FrameRule::Prefixed { width, min } => {
                if rest.len() < width.len() {
                    return Some(Err(ReadError::TruncatedRecord {
                        offset,
                        tag,
                        needed: width.len(),
                        available: rest.len(),
                        trailing: true,
                    }));
                }
                let mut field = &rest[..width.len()];
                let declared = match width {
                    PrefixWidth::U8 => field.get_u8() as usize,
                    PrefixWidth::U16 => field.get_u16_le() as usize,
                };
                if declared < min {
                    // only a frame cut off by the end of the buffer is a partial write
                    let frame_end = offset + 1 + width.len() + declared;
                    return Some(Err(ReadError::TruncatedRecord {
                        offset,
                        tag,
                        needed: min,
                        available: declared,
                        trailing: frame_end > self.data.len(),
                    }));
                }
                (width.len(), declared)
            }
        };

        let available = rest.len() - prefix_len;
        if available < payload_len {
            return Some(Err(ReadError::TruncatedRecord {
                offset,
                tag,
                needed: payload_len,
                available,
                trailing: true,
            }));
        }

        let payload = &rest[prefix_len..prefix_len + payload_len];
        self.pos = offset + 1 + prefix_len + payload_len;

        let format = if tag == SESSION_INFO && (active.is_none() || !self.forced) {
            match self.switch_format(offset, payload[0]) {
                Ok(version) => version,
                Err(err) => return Some(Err(err)),
            }
        } else {
            // `active` is only None while awaiting the session record
            active.unwrap_or(FormatVersion::V1)
        };

        Some(Ok(RawRecord {
            offset,
            tag,
            payload,
            format,
        }))
    }

    /// Apply the version declared by a SessionInfo record.
    fn switch_format(&mut self, offset: usize, declared: u8) -> Result<FormatVersion, ReadError> {
        match FormatVersion::from_id(declared) {
            // headerless blocks can't follow a tagged header
            Some(FormatVersion::Legacy) | None => Err(ReadError::UnsupportedFormatVersion {
                offset,
                version: Some(declared),
            }),
            Some(version) => {
                if self.format() != Some(version) {
                    tracing::debug!(offset, version = version.id(), "Switching frame table");
                }
                self.framing = Framing::Tagged(version.spec());
                Ok(version)
            }
        }
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<RawRecord<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_record();
        match &item {
            None | Some(Err(_)) => self.done = true,
            Some(Ok(_)) => {}
        }
        item
    }
}

impl std::iter::FusedIterator for RecordReader<'_> {}
