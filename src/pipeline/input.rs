//! Input files and the pen storage layout.
//!
//! The pen stores ink as `.../<book>/<page>/<part>.pen`. A page is split into
//! numbered parts that must be read in order, and the directory names are the
//! only page identity a headerless file has.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ink::PageId;

/// One file's bytes plus what is known about it up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Identifier reported in warnings and results
    pub source: String,
    pub data: Vec<u8>,
    /// Page identity applied before the first record, as if read from a
    /// PageInfo record
    pub page_hint: Option<PageId>,
}

impl InputFile {
    pub fn new(source: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            data,
            page_hint: None,
        }
    }

    pub fn with_page_hint(mut self, page: PageId) -> Self {
        self.page_hint = Some(page);
        self
    }

    /// Read a file from disk, deriving the page hint from its location.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Ok(Self {
            source: path.display().to_string(),
            data,
            page_hint: page_hint_from_path(path),
        })
    }
}

/// Book, page and part number of a file in the pen storage layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StorageLocation {
    pub book: u32,
    pub page: u32,
    pub part: u32,
}

impl StorageLocation {
    /// Parse `.../<book>/<page>/<part>.pen`. All three must be numeric.
    pub fn from_path(path: &Path) -> Option<Self> {
        let part = path.file_stem()?.to_str()?.parse().ok()?;
        let page_dir = path.parent()?;
        let page = page_dir.file_name()?.to_str()?.parse().ok()?;
        let book = page_dir.parent()?.file_name()?.to_str()?.parse().ok()?;
        Some(Self { book, page, part })
    }
}

/// Page identity implied by a file's location. The layout carries no owner,
/// so the owner id is 0. The part number need not be numeric here.
pub fn page_hint_from_path(path: &Path) -> Option<PageId> {
    let page_dir = path.parent()?;
    let page = page_dir.file_name()?.to_str()?.parse().ok()?;
    let book = page_dir.parent()?.file_name()?.to_str()?.parse().ok()?;
    Some(PageId::new(0, book, page))
}

/// Sort paths by book, page and part number. Paths outside the storage
/// layout keep their relative order after all the others.
pub fn storage_order(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| {
        let location = StorageLocation::from_path(path);
        (location.is_none(), location)
    });
}
