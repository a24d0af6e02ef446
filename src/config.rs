//! Configuration for the extraction pipeline.
//!
//! Configuration is always passed in by the caller. The library never reads
//! files or the environment on its own; [`ExtractionConfig::from_toml_str`] is
//! a convenience for callers that keep settings in TOML.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::{FormatVersion, ScaleTable};
use crate::ink::PageChangePolicy;

/// Default outlier threshold: one Ncode unit.
pub const DEFAULT_OUTLIER_DISTANCE_MM: f64 = 2.371;

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Combine pages with the same identity across and within files
    pub merge_pages_by_identity: bool,
    /// Pen down before any page information is fatal instead of using (0,0,0)
    pub require_page_context: bool,
    /// Frame every file with this version, ignoring session headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version_override: Option<u8>,
    /// Handling of a page change while a stroke is open
    pub page_change_policy: PageChangePolicy,
    /// Scale table used instead of each format's own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_override: Option<ScaleTable>,
    /// Filters applied to mapped strokes
    pub cleanup: CleanupConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            merge_pages_by_identity: false,
            require_page_context: false,
            format_version_override: None,
            page_change_policy: PageChangePolicy::Seal,
            scale_override: None,
            cleanup: CleanupConfig::default(),
        }
    }
}

/// Stroke cleanup filters. All off by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Pull single-dot spikes back between their neighbours
    pub remove_outliers: bool,
    /// Spike threshold in millimetres
    pub outlier_distance_mm: f64,
    /// Collapse consecutive dots at the same position
    pub merge_duplicate_dots: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove_outliers: false,
            outlier_distance_mm: DEFAULT_OUTLIER_DISTANCE_MM,
            merge_duplicate_dots: false,
        }
    }
}

impl CleanupConfig {
    /// True when at least one filter is enabled.
    pub fn is_enabled(&self) -> bool {
        self.remove_outliers || self.merge_duplicate_dots
    }
}

impl ExtractionConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExtractionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't: version ids, scale and threshold ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = self.format_version_override {
            FormatVersion::try_from(id).map_err(ConfigError::InvalidFormatVersion)?;
        }
        if let Some(scale) = &self.scale_override {
            let fields = [
                ("x_scale", scale.x_scale),
                ("y_scale", scale.y_scale),
                ("pressure_max", scale.pressure_max),
            ];
            for (name, value) in fields {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::InvalidScale(format!(
                        "{} must be a positive number, got {}",
                        name, value
                    )));
                }
            }
        }
        let distance = self.cleanup.outlier_distance_mm;
        if !distance.is_finite() || distance < 0.0 {
            return Err(ConfigError::InvalidCleanup(format!(
                "outlier_distance_mm must be non-negative, got {}",
                distance
            )));
        }
        Ok(())
    }

    /// The forced format version, if any. Call [`validate`](Self::validate)
    /// first; an unknown id reads as no override.
    pub fn format_override(&self) -> Option<FormatVersion> {
        self.format_version_override.and_then(FormatVersion::from_id)
    }
}
