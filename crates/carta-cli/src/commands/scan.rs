//! Scan command - extract data from a single image or PDF.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use carta_core::{CapturedImage, ScanKind};

use super::render::{OutputFormat, render};
use super::{build_scanner, config, describe};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (image or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Document kind: card or invoice
    #[arg(short, long, default_value = "card")]
    kind: ScanKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use a saved model response instead of calling the API
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Show whether the response parsed or was recovered
    #[arg(long)]
    show_outcome: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning {} as {}", args.input.display(), args.kind);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Capturing image...");
    let image = CapturedImage::from_path(&args.input, &config.capture).map_err(describe)?;
    debug!("Captured {} ({} bytes)", image.mime_type, image.decoded_len());

    let scanner = build_scanner(&config, args.response_file.as_deref())?;

    pb.set_message(format!("Processing with {}...", scanner.model_name()));
    let scan = scanner.scan_kind(args.kind, &image).await.map_err(describe)?;

    pb.finish_and_clear();

    if args.validate && !scan.warnings.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &scan.warnings {
            eprintln!("  - {}", issue);
        }
    }

    let output = render(&scan.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_outcome {
        eprintln!();
        eprintln!("{} Repair outcome: {:?}", style("ℹ").blue(), scan.outcome);
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            scan.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
