//! Extract subcommand handler

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};

use neopen::pipeline::storage_order;
use neopen::{ExtractionConfig, Extractor, InputFile};

use crate::ExtractArgs;

/// Build the configuration from the config file, then apply flags on top.
fn load_config(args: &ExtractArgs) -> Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ExtractionConfig::from_toml_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ExtractionConfig::default(),
    };

    if args.merge_pages {
        config.merge_pages_by_identity = true;
    }
    if args.require_page_context {
        config.require_page_context = true;
    }
    if let Some(version) = args.format_version {
        config.format_version_override = Some(version);
    }
    if let Some(policy) = args.page_change {
        config.page_change_policy = policy.into();
    }
    Ok(config)
}

/// Extract the given files and print the batch as JSON on stdout.
///
/// Warnings and fatal errors go to stderr as well. Exits with status 1 when
/// any file failed.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: ExtractArgs) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let extractor = Extractor::new(config).context("Invalid extraction settings")?;

    let mut paths = args.files.clone();
    storage_order(&mut paths);

    let inputs = paths
        .iter()
        .map(|path| {
            InputFile::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch = extractor.extract_batch(&inputs);

    for file in &batch.files {
        for warning in &file.result.warnings {
            eprintln!("warning: {}", warning);
        }
        if let Some(err) = &file.error {
            eprintln!("error: {}: {}", file.source, err);
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&batch)?
    } else {
        serde_json::to_string(&batch)?
    };
    println!("{}", json);

    Ok(if batch.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
