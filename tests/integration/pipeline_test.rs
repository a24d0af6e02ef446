//! End-to-end extraction tests

use neopen::format::tag::{DOT, PAGE_INFO};
use neopen::pipeline::storage_order;
use neopen::record::StreamEncoder;
use neopen::warning::{ClampedValue, DotField};
use neopen::{
    ExtractError, ExtractionConfig, Extractor, FormatVersion, InputFile, PageChangePolicy, PageId,
    ScaleTable, WarningKind,
};

use crate::helpers::{assert_close, dot, v1, v1_single_stroke, v2, write_storage_file};

fn extractor(config: ExtractionConfig) -> Extractor {
    Extractor::new(config).unwrap()
}

// ============================================================================
// Single File
// ============================================================================

#[test]
fn two_dot_stroke_maps_with_fixed_scale() {
    let data = v1()
        .page_info(PageId::new(1, 1, 1))
        .pen_down(0)
        .dot(&dot(10, 10, 50, 0))
        .dot(&dot(12, 11, 52, 5))
        .pen_up(5)
        .finish();
    let config = ExtractionConfig {
        scale_override: Some(ScaleTable {
            x_scale: 0.1,
            y_scale: 0.1,
            pressure_max: 100.0,
        }),
        ..ExtractionConfig::default()
    };

    let file = extractor(config).extract_bytes("e2e.pen", &data);

    assert!(file.is_ok());
    assert!(file.result.warnings.is_empty());
    assert_eq!(file.result.pages.len(), 1);
    let page = &file.result.pages[0];
    assert_eq!(page.id, PageId::new(1, 1, 1));
    assert_eq!(page.strokes.len(), 1);

    let dots = &page.strokes[0].dots;
    assert_eq!(dots.len(), 2);
    assert_close(dots[0].x, 1.0);
    assert_close(dots[0].y, 1.0);
    assert_close(dots[0].pressure, 0.5);
    assert_eq!(dots[0].timestamp, 0);
    assert_close(dots[1].x, 1.2);
    assert_close(dots[1].y, 1.1);
    assert_close(dots[1].pressure, 0.52);
    assert_eq!(dots[1].timestamp, 5);
    // exactly raw times scale, no rounding on top
    assert_eq!(dots[1].x, 12.0 * 0.1);
}

#[test]
fn native_scale_is_ncode_millimetres() {
    let data = v1_single_stroke(PageId::new(0, 610, 1), 0, 1);
    let file = extractor(ExtractionConfig::default()).extract_bytes("a.pen", &data);
    let first = file.result.pages[0].strokes[0].dots[0];
    assert_eq!(first.x, 100.0 * (2.371 / 100.0));
    assert_close(first.pressure, 40.0 / 255.0);
}

#[test]
fn unknown_tag_between_dots_is_skipped() {
    let data = v1()
        .page_info(PageId::new(1, 1, 1))
        .pen_down(0)
        .dot(&dot(100, 100, 10, 0))
        .record(0x7E, &[9, 9, 9, 9])
        .dot(&dot(200, 200, 10, 3))
        .pen_up(4)
        .finish();

    let file = extractor(ExtractionConfig::default()).extract_bytes("a.pen", &data);

    assert!(file.is_ok());
    assert_eq!(file.result.pages[0].strokes.len(), 1);
    assert_eq!(file.result.pages[0].strokes[0].dots.len(), 2);
    assert_eq!(file.result.warnings.len(), 1);
    assert_eq!(
        file.result.warnings[0].kind,
        WarningKind::UnknownTag { tag: 0x7E, len: 4 }
    );
}

#[test]
fn v2_dots_carry_tilt_and_absolute_time() {
    let mut tilted = dot(150, 250, 1023, 1_000);
    tilted.tilt = Some((30, 40));
    let data = v2()
        .page_info(PageId::new(2, 601, 4))
        .pen_down(990)
        .dot(&tilted)
        .pen_up(1_010)
        .finish();

    let file = extractor(ExtractionConfig::default()).extract_bytes("v2.pen", &data);

    let page = &file.result.pages[0];
    assert_eq!(page.notebook().name, "Pocket_Notebook");
    let stroke = &page.strokes[0];
    assert_eq!((stroke.start_time, stroke.end_time), (990, 1_010));
    assert_eq!(stroke.dots[0].tilt, Some((30, 40)));
    assert_eq!(stroke.dots[0].timestamp, 1_000);
    assert_eq!(stroke.dots[0].pressure, 1.0);
}

#[test]
fn clamped_pressure_is_reported_and_dot_kept() {
    let offset = v2().page_info(PageId::new(0, 1, 1)).pen_down(0).finish().len();
    let data = v2()
        .page_info(PageId::new(0, 1, 1))
        .pen_down(0)
        .dot(&dot(150, 250, 2_000, 1))
        .dot(&dot(160, 250, 500, 2))
        .pen_up(3)
        .finish();

    let file = extractor(ExtractionConfig::default()).extract_bytes("hard.pen", &data);

    assert!(file.is_ok());
    let dots = &file.result.pages[0].strokes[0].dots;
    assert_eq!(dots.len(), 2);
    assert_eq!(dots[0].pressure, 1.0);
    assert_eq!(file.result.warnings.len(), 1);
    let warning = &file.result.warnings[0];
    assert_eq!(warning.source, "hard.pen");
    assert_eq!(warning.offset, Some(offset));
    assert_eq!(
        warning.kind,
        WarningKind::ValueClamped(ClampedValue {
            field: DotField::Pressure,
            raw: 2_000,
            clamped: 1023,
        })
    );
}

#[test]
fn session_info_mid_file_switches_framing() {
    let mut data = v1_single_stroke(PageId::new(0, 1, 1), 0, 2);
    data.extend(
        StreamEncoder::new(FormatVersion::V2)
            .session_info(2, 1)
            .page_info(PageId::new(0, 1, 2))
            .pen_down(100)
            .dot(&dot(5, 5, 500, 100))
            .pen_up(101)
            .finish(),
    );

    let file = extractor(ExtractionConfig::default()).extract_bytes("mixed.pen", &data);

    assert!(file.is_ok(), "{:?}", file.error);
    assert_eq!(file.result.pages.len(), 2);
    assert_close(file.result.pages[1].strokes[0].dots[0].pressure, 500.0 / 1023.0);
}

#[test]
fn unsupported_declared_version_is_fatal() {
    let data = StreamEncoder::new(FormatVersion::V1)
        .session_info(9, 0)
        .finish();
    let file = extractor(ExtractionConfig::default()).extract_bytes("future.pen", &data);
    assert_eq!(
        file.error,
        Some(ExtractError::UnsupportedFormatVersion {
            offset: 0,
            version: Some(9)
        })
    );
}

#[test]
fn page_change_policy_split_continues_stroke() {
    let data = v1()
        .page_info(PageId::new(0, 1, 1))
        .pen_down(0)
        .dot(&dot(1, 1, 1, 0))
        .page_info(PageId::new(0, 1, 2))
        .dot(&dot(2, 2, 1, 1))
        .pen_up(2)
        .finish();

    let seal = extractor(ExtractionConfig::default()).extract_bytes("a.pen", &data);
    assert_eq!(seal.result.pages.len(), 1);

    let split = extractor(ExtractionConfig {
        page_change_policy: PageChangePolicy::Split,
        ..ExtractionConfig::default()
    })
    .extract_bytes("a.pen", &data);
    assert_eq!(split.result.pages.len(), 2);
    assert_eq!(split.result.pages[1].strokes[0].end_time, 2);
}

#[test]
fn cleanup_filters_run_when_enabled() {
    let data = v1()
        .page_info(PageId::new(0, 1, 1))
        .pen_down(0)
        .dot(&dot(1000, 1000, 10, 0))
        .dot(&dot(1000, 1000, 90, 1))
        .dot(&dot(1001, 1000, 10, 2))
        .pen_up(3)
        .finish();

    let mut config = ExtractionConfig::default();
    let plain = extractor(config.clone()).extract_bytes("a.pen", &data);
    assert_eq!(plain.result.dot_count(), 3);

    config.cleanup.merge_duplicate_dots = true;
    let cleaned = extractor(config).extract_bytes("a.pen", &data);
    let dots = &cleaned.result.pages[0].strokes[0].dots;
    assert_eq!(dots.len(), 2);
    assert_close(dots[0].pressure, 90.0 / 255.0);
    assert_eq!(dots[0].timestamp, 0);
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn non_trailing_truncation_only_fails_its_file() {
    let broken = v2()
        .page_info(PageId::new(0, 1, 1))
        // page info declaring 4 bytes where 12 are required
        .bytes(&[PAGE_INFO, 4, 0, 0, 0, 0])
        .pen_down(0)
        .finish();
    let sibling = v1_single_stroke(PageId::new(0, 1, 2), 0, 3);

    let batch = extractor(ExtractionConfig::default()).extract_batch(&[
        InputFile::new("broken.pen", broken),
        InputFile::new("good.pen", sibling),
    ]);

    let failed = &batch.files[0];
    assert!(failed.result.pages.is_empty());
    assert!(matches!(
        failed.error,
        Some(ExtractError::TruncatedRecord {
            tag: PAGE_INFO,
            needed: 12,
            available: 4,
            ..
        })
    ));

    let good = &batch.files[1];
    assert!(good.is_ok());
    assert_eq!(good.result.dot_count(), 3);

    assert!(batch.has_errors());
    assert_eq!(batch.combined.pages.len(), 1);
    assert_eq!(batch.combined.pages[0].id, PageId::new(0, 1, 2));
}

#[test]
fn overflowing_clock_does_not_stop_the_batch() {
    let corrupt = v1()
        .page_info(PageId::new(0, 1, 1))
        .pen_down(u64::MAX)
        // delta 1, x 10.00, y 10.00, pressure 40
        .bytes(&[DOT, 1, 10, 0, 10, 0, 0, 0, 40])
        .pen_up(u64::MAX)
        .finish();
    let sibling = v1_single_stroke(PageId::new(0, 1, 2), 0, 2);

    let batch = extractor(ExtractionConfig::default()).extract_batch(&[
        InputFile::new("corrupt.pen", corrupt),
        InputFile::new("good.pen", sibling),
    ]);

    assert!(!batch.has_errors());
    let corrupt = &batch.files[0].result;
    assert_eq!(corrupt.pages[0].strokes[0].dots[0].timestamp, u64::MAX);
    assert_eq!(batch.files[1].result.dot_count(), 2);
    assert_eq!(batch.combined.pages.len(), 2);
}

#[test]
fn batch_keeps_input_order() {
    let inputs: Vec<InputFile> = (0..64)
        .map(|i| {
            // uneven sizes so workers finish out of order
            let dots = if i % 3 == 0 { 200 } else { 1 };
            InputFile::new(
                format!("{}.pen", i),
                v1_single_stroke(PageId::new(0, 1, i), 0, dots),
            )
        })
        .collect();

    let batch = extractor(ExtractionConfig::default()).extract_batch(&inputs);

    let sources: Vec<_> = batch.files.iter().map(|f| f.source.clone()).collect();
    let expected: Vec<_> = (0..64).map(|i| format!("{}.pen", i)).collect();
    assert_eq!(sources, expected);
    let pages: Vec<_> = batch.combined.pages.iter().map(|p| p.id.page_id).collect();
    assert_eq!(pages, (0..64).collect::<Vec<_>>());
}

#[test]
fn merge_combines_pages_across_files() {
    let page = PageId::new(0, 1, 1);
    let inputs = vec![
        InputFile::new("a.pen", v1_single_stroke(page, 0, 1)),
        InputFile::new("b.pen", v1_single_stroke(PageId::new(0, 1, 2), 10, 1)),
        InputFile::new("c.pen", v1_single_stroke(page, 20, 1)),
    ];

    let separate = extractor(ExtractionConfig::default()).extract_batch(&inputs);
    assert_eq!(separate.combined.pages.len(), 3);

    let merged = extractor(ExtractionConfig {
        merge_pages_by_identity: true,
        ..ExtractionConfig::default()
    })
    .extract_batch(&inputs);
    let combined = &merged.combined.pages;
    assert_eq!(combined.len(), 2);
    assert_eq!(combined[0].id, page);
    let starts: Vec<_> = combined[0].strokes.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![0, 20]);
}

#[test]
fn warnings_name_their_file() {
    let noisy = v1().pen_up(0).finish();
    let batch = extractor(ExtractionConfig::default()).extract_batch(&[
        InputFile::new("quiet.pen", v1_single_stroke(PageId::new(0, 1, 1), 0, 1)),
        InputFile::new("noisy.pen", noisy),
    ]);

    assert_eq!(batch.combined.warnings.len(), 1);
    let warning = &batch.combined.warnings[0];
    assert_eq!(warning.source, "noisy.pen");
    assert_eq!(warning.kind, WarningKind::UnmatchedPenUp);
    assert!(warning.to_string().starts_with("noisy.pen@"));
}

// ============================================================================
// Pen Storage Layout
// ============================================================================

#[test]
fn legacy_files_take_page_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let part = |start: u64| {
        StreamEncoder::new(FormatVersion::Legacy)
            .legacy_stroke(
                start,
                start + 10,
                &[dot(500, 600, 128, start), dot(510, 600, 128, start + 4)],
            )
            .legacy_terminator()
            .finish()
    };
    let second = write_storage_file(dir.path(), 610, 3, 2, &part(100));
    let first = write_storage_file(dir.path(), 610, 3, 1, &part(0));

    let mut paths = vec![second, first];
    storage_order(&mut paths);
    let inputs: Vec<_> = paths
        .iter()
        .map(|path| InputFile::from_path(path).unwrap())
        .collect();

    let config = ExtractionConfig {
        format_version_override: Some(0),
        require_page_context: true,
        merge_pages_by_identity: true,
        ..ExtractionConfig::default()
    };
    let batch = extractor(config).extract_batch(&inputs);

    assert!(!batch.has_errors());
    let pages = &batch.combined.pages;
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, PageId::new(0, 610, 3));
    assert_eq!(pages[0].notebook().name, "Plain_Notebook");

    let strokes = &pages[0].strokes;
    assert_eq!(strokes.len(), 2);
    assert_eq!((strokes[0].start_time, strokes[0].end_time), (0, 10));
    assert_eq!(strokes[1].start_time, 100);
    assert_eq!(strokes[0].dots[1].timestamp, 4);
}

#[test]
fn config_file_round_trip_drives_extraction() {
    let config = ExtractionConfig::from_toml_str(
        r#"
        page_change_policy = "split"

        [cleanup]
        remove_outliers = true
        outlier_distance_mm = 1.0
        "#,
    )
    .unwrap();
    assert_eq!(config.page_change_policy, PageChangePolicy::Split);

    let file = extractor(config).extract_bytes(
        "a.pen",
        &v1_single_stroke(PageId::new(0, 1, 1), 0, 5),
    );
    assert!(file.is_ok());
}
