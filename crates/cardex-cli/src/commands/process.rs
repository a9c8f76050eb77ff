//! Process command - extract contact details from a single card.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use cardex_core::models::config::CardexConfig;
use cardex_core::models::contact::FieldCandidate;
use cardex_core::{
    assemble, CardExtraction, CardPipeline, ContactRecord, CsvRowStore, FieldKind, LocalArchive,
    OcrEngine, OcrOutput, RawCapture, SourceKind,
};

use super::config::load_config;
use super::engine::{CliEngine, InputKind};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (card image, or .txt with OCR output)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Retry OCR at 90/180/270 degrees and keep the richest result
    #[arg(long)]
    rotate: bool,

    /// Append the contact row to this CSV file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Copy the card image into this directory and record its link
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Save a row even when no text was detected
    #[arg(long)]
    allow_empty: bool,

    /// Show field candidates with confidence scores
    #[arg(long)]
    show_candidates: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output in store column layout
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// JSON view of one processed card.
#[derive(Serialize)]
struct CardReport<'a> {
    file_name: &'a str,
    source: &'static str,
    timestamp: String,
    record: &'a ContactRecord,
    warnings: &'a [String],
    raw_text: &'a str,
}

/// Card loaded from disk and run through extraction.
pub(super) struct ProcessedCard {
    pub extraction: CardExtraction,
    /// Original image bytes, for archiving.
    pub image_bytes: Option<Vec<u8>>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.rotate {
        config.ocr.try_rotations = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let kind = InputKind::detect(&args.input)
        .ok_or_else(|| anyhow::anyhow!("Unsupported file format: {}", args.input.display()))?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading OCR models...");
    pb.set_position(10);
    let pipeline = build_pipeline(
        &config,
        args.model_dir.as_ref(),
        args.archive_dir.as_ref(),
        kind == InputKind::Image,
    )?;

    pb.set_message("Extracting contact details...");
    pb.set_position(40);
    let card = process_file(&pipeline, &args.input, kind)?;

    if let Some(store_path) = &args.store {
        pb.set_message("Saving row...");
        pb.set_position(80);
        let mut store = CsvRowStore::new(store_path);
        if save_card(&pipeline, &card, &mut store, args.allow_empty)? {
            eprintln!(
                "{} Saved contact to {}",
                style("✓").green(),
                store_path.display()
            );
        }
    }

    pb.finish_and_clear();

    let extraction = &card.extraction;
    if extraction.no_text_detected() {
        eprintln!("{} No text detected in {}", style("⚠").yellow(), args.input.display());
    }

    let output = format_extraction(extraction, args.format, &pipeline, &config)?;

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

    if args.show_candidates {
        println!();
        print_candidates(&extraction.result.candidates);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Build the pipeline shared by the process and batch commands.
pub(super) fn build_pipeline(
    config: &CardexConfig,
    model_dir: Option<&PathBuf>,
    archive_dir: Option<&PathBuf>,
    needs_ocr: bool,
) -> anyhow::Result<CardPipeline<CliEngine>> {
    let engine = CliEngine::load(&config.ocr, model_dir, needs_ocr);
    let pipeline = CardPipeline::new(engine, config)?;

    Ok(match archive_dir {
        Some(dir) => pipeline.with_archive(LocalArchive::new(dir)?),
        None => pipeline,
    })
}

/// Run one input file through OCR (images only) and extraction.
pub(super) fn process_file<E: OcrEngine>(
    pipeline: &CardPipeline<E>,
    path: &Path,
    kind: InputKind,
) -> anyhow::Result<ProcessedCard> {
    match kind {
        InputKind::Text => {
            let text = fs::read_to_string(path)?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("card.txt");
            let extraction =
                pipeline.extract_output(&OcrOutput::Text(text), file_name, SourceKind::Upload);
            Ok(ProcessedCard {
                extraction,
                image_bytes: None,
            })
        }
        InputKind::Image => {
            let capture = RawCapture::from_path(path)?;
            let extraction = pipeline.extract(&capture)?;
            Ok(ProcessedCard {
                extraction,
                image_bytes: Some(capture.bytes),
            })
        }
    }
}

/// Submit a card to the store. Returns whether a row was written.
///
/// Cards without any detected text are skipped unless `allow_empty` is set.
pub(super) fn save_card<E: OcrEngine>(
    pipeline: &CardPipeline<E>,
    card: &ProcessedCard,
    store: &mut CsvRowStore,
    allow_empty: bool,
) -> anyhow::Result<bool> {
    let extraction = &card.extraction;
    if extraction.no_text_detected() && !allow_empty {
        warn!(
            "No text detected in {}, not saving",
            extraction.metadata.file_name
        );
        return Ok(false);
    }

    match pipeline.submit(extraction, card.image_bytes.as_deref(), store) {
        Ok(_) => Ok(true),
        Err(e) => {
            eprintln!(
                "{} Row for {} was not saved:",
                style("✗").red(),
                extraction.metadata.file_name
            );
            for (column, value) in e.row().columns.iter().zip(&e.row().values) {
                eprintln!("  {}: {}", column.as_str(), value);
            }
            Err(e.into())
        }
    }
}

pub(super) fn format_extraction<E: OcrEngine>(
    extraction: &CardExtraction,
    format: OutputFormat,
    pipeline: &CardPipeline<E>,
    config: &CardexConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(extraction, config),
        OutputFormat::Csv => format_csv(extraction, pipeline, config),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_json(extraction: &CardExtraction, config: &CardexConfig) -> anyhow::Result<String> {
    let metadata = &extraction.metadata;
    let report = CardReport {
        file_name: &metadata.file_name,
        source: metadata.source_kind.as_str(),
        timestamp: metadata
            .timestamp
            .format(&config.store.timestamp_format)
            .to_string(),
        record: &extraction.result.record,
        warnings: &extraction.result.warnings,
        raw_text: &metadata.raw_text,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn format_csv<E: OcrEngine>(
    extraction: &CardExtraction,
    pipeline: &CardPipeline<E>,
    config: &CardexConfig,
) -> anyhow::Result<String> {
    let row = assemble(
        &extraction.result.record,
        &extraction.metadata,
        "",
        pipeline.columns(),
        &config.store.timestamp_format,
    );

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(row.header())?;
    wtr.write_record(&row.values)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &CardExtraction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", extraction.metadata.file_name));
    output.push('\n');

    for (kind, value) in extraction.result.record.fields() {
        output.push_str(&format!("  {:<12} {}\n", format!("{}:", label(kind)), value));
    }

    if !extraction.result.warnings.is_empty() {
        output.push('\n');
        output.push_str("Warnings:\n");
        for warning in &extraction.result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

fn label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Company => "Company",
        FieldKind::Name => "Name",
        FieldKind::Phone => "Phone",
        FieldKind::Whatsapp => "WhatsApp",
        FieldKind::Email => "Email",
        FieldKind::Website => "Website",
        FieldKind::Designation => "Designation",
        FieldKind::Address => "Address",
    }
}

fn print_candidates(candidates: &[FieldCandidate]) {
    println!("{}", style("Candidates:").bold());
    for candidate in candidates {
        println!(
            "  {} {:<12} line {:>2}  {:.0}%  {}",
            style("ℹ").blue(),
            candidate.kind.as_str(),
            candidate.line_index,
            candidate.confidence() * 100.0,
            candidate.value
        );
    }
}
