//! Extraction pipeline over pen storage files.
//!
//! Each input runs through the full chain on its own:
//!
//! ```text
//! bytes -> RecordReader -> decode -> ContextTracker -> map_page -> cleanup
//! ```
//!
//! Batches fan out over the rayon pool, one file per task, and are collected
//! back in input order. Reading files from disk ([`InputFile::from_path`]) is
//! the only blocking I/O in the crate.
//!
//! # Module Structure
//!
//! - [`input`] - Input files, page hints from the storage layout
//! - [`extractor`] - Per-file extraction and batch orchestration
//! - [`result`] - Per-file and combined outputs, page merging

mod extractor;
mod input;
mod result;

pub use extractor::{extract, Extractor};
pub use input::{page_hint_from_path, storage_order, InputFile, StorageLocation};
pub use result::{merge_pages, BatchExtraction, ExtractionResult, FileExtraction};
