//! neopen - extract handwritten strokes from smartpen storage dumps
//!
//! A smartpen keeps what it writes as binary log files: tagged records for
//! session and page information, pen down and pen up, and one record per
//! sampled dot. This crate frames and decodes those records, rebuilds the
//! page and stroke structure from the running pen state, and maps raw device
//! units to millimetres.
//!
//! ```no_run
//! use neopen::{ExtractionConfig, Extractor, InputFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = InputFile::from_path("pen/610/12/1.pen".as_ref())?;
//! let batch = Extractor::new(ExtractionConfig::default())?.extract_batch(&[input]);
//! for page in &batch.combined.pages {
//!     println!("{}: {} strokes", page.id, page.strokes.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Structure
//!
//! - [`format`] - Format versions, frame tables, scale tables
//! - [`record`] - Record framing, decoding and encoding
//! - [`ink`] - Stroke model, context tracker, mapper
//! - [`transforms`] - Optional stroke cleanup
//! - [`pipeline`] - Per-file and batch extraction
//! - [`config`] - Extraction configuration

pub mod config;
pub mod error;
pub mod format;
pub mod ink;
pub mod pipeline;
pub mod record;
pub mod transforms;
pub mod warning;

pub use config::{CleanupConfig, ExtractionConfig};
pub use error::{ConfigError, DecodeError, ExtractError, ReadError};
pub use format::{FormatVersion, ScaleTable};
pub use ink::{Dot, Notebook, Page, PageChangePolicy, PageId, Stroke};
pub use pipeline::{extract, BatchExtraction, ExtractionResult, Extractor, FileExtraction, InputFile};
pub use warning::{Warning, WarningKind};
