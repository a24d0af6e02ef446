//! Per-file extraction and batch orchestration.

use rayon::prelude::*;

use super::input::InputFile;
use super::result::{merge_pages, BatchExtraction, ExtractionResult, FileExtraction};
use crate::config::ExtractionConfig;
use crate::error::{ConfigError, ExtractError, ReadError};
use crate::format::FormatVersion;
use crate::ink::{map_page, ContextTracker, Page, RawPage};
use crate::record::{decode, RecordReader};
use crate::transforms::{apply_transforms, from_config};
use crate::warning::{Warning, WarningKind};

/// Runs reader, decoder, tracker, mapper and cleanup over input files.
///
/// Files are independent: each one gets its own tracker, and a fatal error
/// in one file never affects another.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    format_override: Option<FormatVersion>,
}

impl Extractor {
    /// Create an extractor after validating `config`.
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let format_override = config.format_override();
        Ok(Self {
            config,
            format_override,
        })
    }

    /// Extract a single in-memory buffer with no page hint.
    pub fn extract_bytes(&self, source: &str, data: &[u8]) -> FileExtraction {
        self.extract_file(&InputFile::new(source, data.to_vec()))
    }

    /// Extract one file.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(source = %input.source, len = input.data.len())
    )]
    pub fn extract_file(&self, input: &InputFile) -> FileExtraction {
        let mut tracker =
            ContextTracker::new(self.config.require_page_context, self.config.page_change_policy);
        if let Some(page) = input.page_hint {
            tracker.seed_page(page);
        }

        let (pages, warnings, error) = match self.run(input, &mut tracker) {
            Ok(()) => {
                tracing::trace!(session = ?tracker.session(), "End of stream");
                let (raw_pages, warnings) = tracker.finish();
                let pages = self.map_pages(&raw_pages);
                (pages, warnings, None)
            }
            Err(err) => {
                tracing::warn!(offset = err.offset(), error = %err, "Extraction aborted");
                (Vec::new(), tracker.warnings().to_vec(), Some(err))
            }
        };

        let warnings: Vec<Warning> = warnings
            .into_iter()
            .map(|warning| warning.with_source(input.source.as_str()))
            .collect();
        tracing::debug!(
            pages = pages.len(),
            warnings = warnings.len(),
            "Extraction finished"
        );

        FileExtraction {
            source: input.source.clone(),
            result: ExtractionResult { pages, warnings },
            error,
        }
    }

    /// Extract every input in parallel. Results keep input order.
    pub fn extract_batch(&self, inputs: &[InputFile]) -> BatchExtraction {
        let files: Vec<FileExtraction> = inputs
            .par_iter()
            .map(|input| self.extract_file(input))
            .collect();

        let mut combined = ExtractionResult::default();
        for file in &files {
            combined.pages.extend(file.result.pages.iter().cloned());
            combined.warnings.extend(file.result.warnings.iter().cloned());
        }
        if self.config.merge_pages_by_identity {
            combined.pages = merge_pages(combined.pages);
        }

        BatchExtraction { files, combined }
    }

    fn run(&self, input: &InputFile, tracker: &mut ContextTracker) -> Result<(), ExtractError> {
        let reader = RecordReader::new(&input.data, self.format_override);
        for item in reader {
            let raw = match item {
                Ok(raw) => raw,
                Err(ReadError::TruncatedRecord {
                    offset,
                    tag,
                    needed,
                    available,
                    trailing: true,
                }) => {
                    tracing::debug!(offset, tag, "Dropping partial record at end of file");
                    tracker.report(Warning::at(
                        offset,
                        WarningKind::TruncatedRecord {
                            tag,
                            needed,
                            available,
                        },
                    ));
                    break;
                }
                Err(err) => return Err(err.into()),
            };

            let decoded = decode(&raw).map_err(|err| ExtractError::from_decode(raw.offset, err))?;
            tracing::trace!(
                offset = decoded.offset,
                record = decoded.record.name(),
                "Decoded record"
            );
            tracker.apply(&decoded)?;
        }
        Ok(())
    }

    fn map_pages(&self, raw_pages: &[RawPage]) -> Vec<Page> {
        let scale = self.config.scale_override.as_ref();
        let mut pages: Vec<Page> = raw_pages.iter().map(|page| map_page(page, scale)).collect();

        if self.config.cleanup.is_enabled() {
            let mut transforms = from_config(&self.config.cleanup);
            tracing::debug!(transforms = transforms.len(), "Cleaning up strokes");
            apply_transforms(&mut pages, &mut transforms);
        }

        if self.config.merge_pages_by_identity {
            pages = merge_pages(pages);
        }
        pages
    }
}

/// Extract `inputs` with `config` in one call.
pub fn extract(inputs: &[InputFile], config: ExtractionConfig) -> Result<BatchExtraction, ConfigError> {
    Ok(Extractor::new(config)?.extract_batch(inputs))
}
