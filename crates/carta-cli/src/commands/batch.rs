//! Batch command - scan multiple files in sequence.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use carta_core::capture::mime_for_extension;
use carta_core::{CapturedImage, CartaConfig, RepairOutcome, ScanKind, ScanRecord, Scanner};

use super::render::{OutputFormat, render, summary_fields, summary_header};
use super::{build_scanner, config, describe};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document kind: card or invoice
    #[arg(short, long, default_value = "card")]
    kind: ScanKind,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Use a saved model response for every file instead of calling the API
    #[arg(long)]
    response_file: Option<PathBuf>,
}

/// Result of scanning a single file.
struct FileResult {
    path: PathBuf,
    record: Option<ScanRecord>,
    outcome: Option<RepairOutcome>,
    warnings: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = config::load(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .and_then(mime_for_extension)
                .is_some()
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to scan",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let scanner = build_scanner(&config, args.response_file.as_deref())?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = scan_file(&path, &scanner, args.kind, &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((record, outcome, warnings)) => {
                results.push(FileResult {
                    path,
                    record: Some(record),
                    outcome: Some(outcome),
                    warnings,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        record: None,
                        outcome: None,
                        warnings: 0,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), error_msg);
                    anyhow::bail!("Scan failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(record) = &result.record {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("scan");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, render(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, args.kind, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn scan_file(
    path: &Path,
    scanner: &Scanner,
    kind: ScanKind,
    config: &CartaConfig,
) -> anyhow::Result<(ScanRecord, RepairOutcome, usize)> {
    let image = CapturedImage::from_path(path, &config.capture).map_err(describe)?;
    let scan = scanner.scan_kind(kind, &image).await.map_err(describe)?;

    for warning in &scan.warnings {
        debug!("{}: {}", path.display(), warning);
    }

    Ok((scan.record, scan.outcome, scan.warnings.len()))
}

fn write_summary(path: &Path, kind: ScanKind, results: &[FileResult]) -> anyhow::Result<()> {
    let header = summary_header(kind);
    let blank_fields = header.len() - 6;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.record {
            Some(record) => {
                row.push("success".to_string());
                row.push(outcome_label(result.outcome).to_string());
                row.extend(summary_fields(record));
                row.push(result.warnings.to_string());
                row.push(result.processing_time_ms.to_string());
                row.push(String::new());
            }
            None => {
                row.push("error".to_string());
                row.push(String::new());
                row.extend(std::iter::repeat_n(String::new(), blank_fields));
                row.push(String::new());
                row.push(result.processing_time_ms.to_string());
                row.push(result.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn outcome_label(outcome: Option<RepairOutcome>) -> &'static str {
    match outcome {
        Some(RepairOutcome::Parsed) => "parsed",
        Some(RepairOutcome::Fallback) => "fallback",
        None => "",
    }
}
