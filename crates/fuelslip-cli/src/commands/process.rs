//! Process command - extract purchase details from a single OCR dump.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fuelslip_core::{
    DetectionResult, FuelslipConfig, ReceiptAnalysis, ReceiptAssembler, ReceiptScanner,
    RecordedOcr,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Recorded OCR output (JSON list of fragments)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Year used to place two-digit years (default: current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Include the strategy used for each field
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = super::load_config(config_path)?;
    if let Some(year) = args.reference_year {
        config.extraction.reference_year = Some(year);
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading OCR output...");
    pb.set_position(10);
    let data = tokio::fs::read(&args.input).await?;

    pb.set_message("Extracting purchase details...");
    pb.set_position(50);
    let analysis = scanner(&config).scan(&data)?;

    pb.finish_and_clear();

    // Format output
    let output = format_analysis(&analysis, args.format, args.trace)?;

    // Write output
    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Scanner over recorded OCR output.
pub fn scanner(config: &FuelslipConfig) -> ReceiptScanner<RecordedOcr> {
    ReceiptScanner::new(RecordedOcr::new(), ReceiptAssembler::new(config))
}

pub fn format_analysis(
    analysis: &ReceiptAnalysis,
    format: OutputFormat,
    with_trace: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if with_trace => Ok(serde_json::to_string(analysis)?),
        OutputFormat::Json => Ok(serde_json::to_string(&analysis.result)?),
        OutputFormat::Csv => format_csv(&analysis.result),
        OutputFormat::Text => Ok(format_text(analysis, with_trace)),
    }
}

fn format_csv(result: &DetectionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "is_target_vendor",
        "location",
        "date_time",
        "fuel_type",
        "amount",
        "volume",
        "rate",
        "detected_words",
    ])?;

    // Write data
    match result {
        DetectionResult::Matched(record) => {
            wtr.write_record([
                "true",
                record.location.as_deref().unwrap_or_default(),
                record.date_time.as_deref().unwrap_or_default(),
                &record.fuel_type,
                &optional(record.amount),
                &optional(record.volume),
                &optional(record.rate),
                "",
            ])?;
        }
        DetectionResult::NotMatched { detected_words } => {
            let words = detected_words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            wtr.write_record(["false", "", "", "", "", "", "", &words])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(analysis: &ReceiptAnalysis, with_trace: bool) -> String {
    let mut output = String::new();

    match &analysis.result {
        DetectionResult::Matched(record) => {
            output.push_str(&format!("{}\n", record.purchase_name()));
            output.push_str(&format!("Location:  {}\n", or_dash(record.location.clone())));
            output.push_str(&format!("Date/time: {}\n", or_dash(record.date_time.clone())));
            output.push_str(&format!("Amount:    {}\n", or_dash(record.amount)));
            output.push_str(&format!("Volume:    {}\n", or_dash(record.volume)));
            output.push_str(&format!("Rate:      {}\n", or_dash(record.rate)));
        }
        DetectionResult::NotMatched { detected_words } => {
            output.push_str("Not a target vendor receipt\n");
            output.push_str("Detected words:\n");
            for word in detected_words {
                output.push_str(&format!("  {} ({:.2})\n", word.text, word.confidence));
            }
        }
    }

    if with_trace && !analysis.trace.is_empty() {
        output.push_str("\nStrategies:\n");
        for entry in analysis.trace.entries() {
            output.push_str(&format!(
                "  {:<10} {} ({})\n",
                entry.field, entry.strategy, entry.source
            ));
        }
        for field in analysis.trace.misses() {
            output.push_str(&format!("  {:<10} not found\n", field));
        }
    }

    output
}

pub fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
