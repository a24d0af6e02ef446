//! Extraction outputs.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ExtractError;
use crate::ink::{Page, PageId};
use crate::warning::Warning;

/// Pages and warnings, in stream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub pages: Vec<Page>,
    pub warnings: Vec<Warning>,
}

impl ExtractionResult {
    pub fn stroke_count(&self) -> usize {
        self.pages.iter().map(|page| page.strokes.len()).sum()
    }

    pub fn dot_count(&self) -> usize {
        self.pages.iter().map(Page::dot_count).sum()
    }
}

/// Outcome for one input file.
///
/// A file with a fatal `error` has no pages but keeps the warnings raised
/// before the error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileExtraction {
    pub source: String,
    #[serde(flatten)]
    pub result: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExtractError>,
}

impl FileExtraction {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file outcomes in input order plus their combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchExtraction {
    pub files: Vec<FileExtraction>,
    /// Pages of every file concatenated (or merged) in input order, with all
    /// warnings
    pub combined: ExtractionResult,
}

impl BatchExtraction {
    pub fn failed(&self) -> impl Iterator<Item = &FileExtraction> {
        self.files.iter().filter(|file| !file.is_ok())
    }

    pub fn has_errors(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Combine pages sharing an identity at the position of their first
/// occurrence. Strokes keep their relative order.
pub fn merge_pages(pages: Vec<Page>) -> Vec<Page> {
    let mut merged: Vec<Page> = Vec::with_capacity(pages.len());
    let mut index: HashMap<PageId, usize> = HashMap::new();
    for page in pages {
        match index.get(&page.id) {
            Some(&i) => merged[i].strokes.extend(page.strokes),
            None => {
                index.insert(page.id, merged.len());
                merged.push(page);
            }
        }
    }
    merged
}
