//! Known notebook dimensions.
//!
//! Paper sizes come from the published Ncode PDFs. The table is not complete;
//! unknown books are assumed to be US Letter.

use serde::Serialize;

/// Paper properties of a notebook
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Notebook {
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Number of pages, 0 when unknown
    pub pages: u32,
}

const US_LETTER: (f64, f64) = (216.0, 280.0);
const DIN_B5: (f64, f64) = (176.0, 250.0);

impl Notebook {
    pub const DEFAULT: Notebook = Notebook::new("Notebook", US_LETTER, 0);
    pub const NCODE: Notebook = Notebook::new("Ncode", US_LETTER, 50);
    pub const POCKET: Notebook = Notebook::new("Pocket_Notebook", (83.0, 144.0), 64);
    pub const PLAIN: Notebook = Notebook::new("Plain_Notebook", DIN_B5, 72);

    const fn new(name: &'static str, (width_mm, height_mm): (f64, f64), pages: u32) -> Self {
        Self {
            name,
            width_mm,
            height_mm,
            pages,
        }
    }

    /// Notebook for a book id, falling back to [`Notebook::DEFAULT`].
    pub fn lookup(book_id: u32) -> Notebook {
        Self::known(book_id).unwrap_or_else(|| {
            tracing::debug!(book_id, "Unknown notebook, assuming US Letter");
            Self::DEFAULT
        })
    }

    /// Notebook for a book id listed in the table.
    pub fn known(book_id: u32) -> Option<Notebook> {
        match book_id {
            551 | 604 | 613 => Some(Self::NCODE),
            601 => Some(Self::POCKET),
            610..=612 => Some(Self::PLAIN),
            _ => None,
        }
    }
}
