//! Shared stream builders and fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};

use neopen::ink::RawDot;
use neopen::record::StreamEncoder;
use neopen::{FormatVersion, PageId};

pub fn dot(x: u32, y: u32, pressure: u16, timestamp: u64) -> RawDot {
    RawDot {
        x,
        y,
        pressure,
        tilt: None,
        timestamp,
    }
}

/// v1 stream with a session header.
pub fn v1() -> StreamEncoder {
    StreamEncoder::new(FormatVersion::V1).session_info(1, 0xC0FFEE)
}

/// v2 stream with a session header.
pub fn v2() -> StreamEncoder {
    StreamEncoder::new(FormatVersion::V2).session_info(2, 0xC0FFEE)
}

/// A complete v1 file with one stroke of `dots` dots on `page`.
pub fn v1_single_stroke(page: PageId, start: u64, dots: u32) -> Vec<u8> {
    let mut encoder = v1().page_info(page).pen_down(start);
    for i in 0..dots {
        encoder = encoder.dot(&dot(100 + i, 100 + i, 40, start + i as u64));
    }
    encoder.pen_up(start + dots as u64).finish()
}

/// Write `data` under `root/<book>/<page>/<part>.pen`.
pub fn write_storage_file(root: &Path, book: u32, page: u32, part: u32, data: &[u8]) -> PathBuf {
    let dir = root.join(book.to_string()).join(page.to_string());
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.pen", part));
    fs::write(&path, data).unwrap();
    path
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
