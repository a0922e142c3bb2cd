//! Extract command - pull RR fields from a single PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use rrx_core::models::config::RrxConfig;
use rrx_core::{
    ExtractedRecord, FIELD_NAMES, ModelExtractor, OpenAiBackend, PatternExtractor, ReceiptParser,
    extract_text_from_path,
};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Extraction method
    #[arg(short, long, value_enum, default_value = "pattern")]
    mode: ExtractMode,

    /// Output format (pattern mode)
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the extracted document text to stderr
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractMode {
    /// Regex field patterns
    Pattern,
    /// Chat-completion model
    Model,
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
    /// File extension used for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Stops the spinner before an error reaches the terminal.
fn clear_on_err<T, E>(pb: &ProgressBar, result: Result<T, E>) -> Result<T, E> {
    result.inspect_err(|_| pb.finish_and_clear())
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = RrxConfig::load_or_default(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting from {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading PDF...");
    let text = clear_on_err(
        &pb,
        extract_text_from_path(&args.input, &config.pdf.page_separator),
    )?;
    debug!("Extracted {} characters", text.len());

    if args.show_text {
        pb.suspend(|| {
            eprintln!("{}", style("Extracted text:").bold());
            eprintln!("{}", text);
        });
    }

    let output = match args.mode {
        ExtractMode::Pattern => {
            pb.set_message("Matching fields...");
            let result = PatternExtractor::new().parse(&text);
            pb.finish_and_clear();

            for warning in &result.warnings {
                eprintln!("{} {}", style("⚠").yellow(), warning);
            }
            format_records(&result.records, args.format)?
        }
        ExtractMode::Model => {
            let backend =
                clear_on_err(&pb, OpenAiBackend::from_env(&config.llm.backend_settings()))?;
            let extractor = ModelExtractor::new(backend, &config.llm);

            pb.set_message(format!("Asking {}...", extractor.model()));
            let result = clear_on_err(&pb, extractor.extract(&text).await)?;
            pb.finish_and_clear();

            match result.data() {
                Some(data) => serde_json::to_string_pretty(data)?,
                None => {
                    let warning = result.reply.warning().unwrap_or_default();
                    warn!("Unparsed model reply: {}", result.raw_reply);
                    eprintln!("{} {}", style("⚠").yellow(), warning);
                    return Ok(());
                }
            }
        }
    };

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render records in the requested format.
pub fn format_records(records: &[ExtractedRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[ExtractedRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(FIELD_NAMES)?;
    for record in records {
        wtr.write_record(record.values())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[ExtractedRecord]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("Record {}:\n", i + 1));
        for (name, value) in FIELD_NAMES.iter().zip(record.values()) {
            output.push_str(&format!("  {}: {}\n", name, value));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cleared_on_error() {
        let pb = ProgressBar::hidden();
        pb.enable_steady_tick(Duration::from_millis(100));

        let result: Result<(), &str> = clear_on_err(&pb, Err("no key"));
        assert!(result.is_err());
        assert!(pb.is_finished());
    }

    #[test]
    fn test_spinner_kept_on_success() {
        let pb = ProgressBar::hidden();

        let value = clear_on_err::<_, &str>(&pb, Ok(7)).unwrap();
        assert_eq!(value, 7);
        assert!(!pb.is_finished());
    }
}
