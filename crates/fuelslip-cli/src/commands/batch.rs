//! Batch processing command for multiple OCR dumps.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use fuelslip_core::{DetectionResult, ReceiptAnalysis, ReceiptScanner, RecordedOcr};

use super::process::{format_analysis, optional, scanner, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching recorded OCR dumps
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Year used to place two-digit years (default: current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    analysis: Option<ReceiptAnalysis>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One line of `summary.csv`.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    is_target_vendor: bool,
    location: &'a str,
    date_time: &'a str,
    fuel_type: &'a str,
    amount: String,
    volume: String,
    rate: String,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = super::load_config(config_path)?;
    if let Some(year) = args.reference_year {
        config.extraction.reference_year = Some(year);
    }

    // Expand glob pattern, keeping only JSON dumps
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("json")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    // Set up progress bar
    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let scanner = scanner(&config);
    let mut results = Vec::with_capacity(files.len());

    // Process files sequentially
    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &scanner).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(analysis) => {
                results.push(ProcessResult {
                    path,
                    analysis: Some(analysis),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        analysis: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.analysis.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(analysis) = &result.analysis else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_analysis(analysis, args.format, false)?;
            tokio::fs::write(&output_path, content).await?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let matched = successful
        .iter()
        .filter(|r| r.analysis.as_ref().is_some_and(|a| a.result.is_target_vendor()))
        .count();

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} target vendor), {} failed",
        style(successful.len()).green(),
        matched,
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

async fn process_single_file(
    path: &Path,
    scanner: &ReceiptScanner<RecordedOcr>,
) -> anyhow::Result<ReceiptAnalysis> {
    let data = tokio::fs::read(path).await?;
    Ok(scanner.scan(&data)?)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let row = match result.analysis.as_ref().map(|a| &a.result) {
            Some(DetectionResult::Matched(record)) => SummaryRow {
                filename,
                status: "success",
                is_target_vendor: true,
                location: record.location.as_deref().unwrap_or_default(),
                date_time: record.date_time.as_deref().unwrap_or_default(),
                fuel_type: &record.fuel_type,
                amount: optional(record.amount),
                volume: optional(record.volume),
                rate: optional(record.rate),
                processing_time_ms: result.processing_time_ms,
                error: "",
            },
            Some(DetectionResult::NotMatched { .. }) | None => SummaryRow {
                filename,
                status: if result.error.is_some() { "error" } else { "success" },
                is_target_vendor: false,
                location: "",
                date_time: "",
                fuel_type: "",
                amount: String::new(),
                volume: String::new(),
                rate: String::new(),
                processing_time_ms: result.processing_time_ms,
                error: result.error.as_deref().unwrap_or(""),
            },
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
