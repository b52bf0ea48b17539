//! Repair command - run only the response repair over saved model output.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use carta_core::{ScanKind, repair_as};

use super::render::{OutputFormat, render};

/// Arguments for the repair command.
#[derive(Args)]
pub struct RepairArgs {
    /// File with the raw model response ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Document kind: card or invoice
    #[arg(short, long, default_value = "card")]
    kind: ScanKind,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the cleaned candidate text and repair outcome
    #[arg(long)]
    show_candidate: bool,
}

pub async fn run(args: RepairArgs) -> anyhow::Result<()> {
    let raw = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let repaired = repair_as(args.kind, &raw);

    if args.show_candidate {
        eprintln!("{} Candidate: {}", style("ℹ").blue(), repaired.candidate);
        eprintln!("{} Repair outcome: {:?}", style("ℹ").blue(), repaired.outcome);
    }

    println!("{}", render(&repaired.record, args.format)?);

    Ok(())
}
