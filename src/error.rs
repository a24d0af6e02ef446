//! Fatal error types.
//!
//! Anything in here aborts processing of the current file only. Conditions the
//! pipeline can recover from are [`Warning`](crate::Warning)s instead.

use serde::Serialize;

fn version_label(version: &Option<u8>) -> String {
    match version {
        Some(version) => format!("{}", version),
        None => "(no session header)".to_string(),
    }
}

/// Errors produced while framing records out of a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// A frame does not fit the bytes available for it.
    ///
    /// `trailing` is true when the buffer simply ends inside the frame, which
    /// is what a partially flushed capture looks like.
    #[error("Truncated record 0x{tag:02x} at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedRecord {
        offset: usize,
        tag: u8,
        needed: usize,
        available: usize,
        trailing: bool,
    },

    #[error("Unsupported format version {} at offset {offset}", version_label(.version))]
    UnsupportedFormatVersion { offset: usize, version: Option<u8> },
}

/// Errors produced while interpreting a single record payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Payload of record 0x{tag:02x} too short: needs {needed} bytes, got {available}")]
    ShortPayload {
        tag: u8,
        needed: usize,
        available: usize,
    },
}

/// Fatal, per-file extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractError {
    #[error("Truncated record 0x{tag:02x} at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedRecord {
        offset: usize,
        tag: u8,
        needed: usize,
        available: usize,
    },

    #[error("Unsupported format version {} at offset {offset}", version_label(.version))]
    UnsupportedFormatVersion { offset: usize, version: Option<u8> },

    #[error("Pen down at offset {offset} before any page information")]
    MissingPageContext { offset: usize },
}

impl ExtractError {
    /// Byte offset of the record that caused the error.
    pub fn offset(&self) -> usize {
        match self {
            ExtractError::TruncatedRecord { offset, .. }
            | ExtractError::UnsupportedFormatVersion { offset, .. }
            | ExtractError::MissingPageContext { offset } => *offset,
        }
    }

    /// Convert a decode failure of the record at `offset`.
    pub fn from_decode(offset: usize, err: DecodeError) -> Self {
        match err {
            DecodeError::ShortPayload {
                tag,
                needed,
                available,
            } => ExtractError::TruncatedRecord {
                offset,
                tag,
                needed,
                available,
            },
        }
    }
}

impl From<ReadError> for ExtractError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::TruncatedRecord {
                offset,
                tag,
                needed,
                available,
                ..
            } => ExtractError::TruncatedRecord {
                offset,
                tag,
                needed,
                available,
            },
            ReadError::UnsupportedFormatVersion { offset, version } => {
                ExtractError::UnsupportedFormatVersion { offset, version }
            }
        }
    }
}

/// Errors loading an [`ExtractionConfig`](crate::ExtractionConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid format version override: {0}")]
    InvalidFormatVersion(String),

    #[error("Invalid scale override: {0}")]
    InvalidScale(String),

    #[error("Invalid cleanup settings: {0}")]
    InvalidCleanup(String),
}
