//! Batch processing command for multiple card files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cardex_core::{CardExtraction, CsvRowStore};

use super::config::load_config;
use super::engine::InputKind;
use super::process::{build_pipeline, format_extraction, process_file, save_card, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "cards/*.jpg")
    #[arg(required = true)]
    input: String,

    /// Output directory for per-card results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Append every contact row to this CSV file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Copy card images into this directory and record their links
    #[arg(long)]
    archive_dir: Option<PathBuf>,

    /// Retry OCR at 90/180/270 degrees and keep the richest result
    #[arg(long)]
    rotate: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<CardExtraction>,
    saved: bool,
    /// Why the row was not saved; the extraction is still kept.
    store_error: Option<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.rotate {
        config.ocr.try_rotations = true;
    }

    let mut files: Vec<(PathBuf, InputKind)> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter_map(|p| InputKind::detect(&p).map(|kind| (p, kind)))
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // One engine for the whole batch.
    let needs_ocr = files.iter().any(|(_, kind)| *kind == InputKind::Image);
    let pipeline = build_pipeline(
        &config,
        args.model_dir.as_ref(),
        args.archive_dir.as_ref(),
        needs_ocr,
    )?;
    let mut store = args.store.clone().map(CsvRowStore::new);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for (path, kind) in files {
        let file_start = Instant::now();

        match process_file(&pipeline, &path, kind) {
            Ok(card) => {
                if card.extraction.no_text_detected() {
                    warn!("No text detected in {}", path.display());
                }

                let (saved, store_error) = match store.as_mut() {
                    Some(store) => match save_card(&pipeline, &card, store, false) {
                        Ok(saved) => (saved, None),
                        Err(e) => {
                            warn!("Row for {} not saved: {}", path.display(), e);
                            (false, Some(e.to_string()))
                        }
                    },
                    None => (false, None),
                };

                results.push(ProcessResult {
                    path,
                    extraction: Some(card.extraction),
                    saved,
                    store_error,
                    error: None,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        extraction: None,
                        saved: false,
                        store_error: None,
                        error: Some(error_msg),
                        processing_time_ms: file_start.elapsed().as_millis() as u64,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(extraction) = &result.extraction else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("card");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_extraction(extraction, args.format, &pipeline, &config)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

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

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );
    if let Some(store_path) = &args.store {
        let saved = results.iter().filter(|r| r.saved).count();
        println!("   {} rows saved to {}", saved, store_path.display());
    }

    let unsaved: Vec<_> = results.iter().filter(|r| r.store_error.is_some()).collect();
    if !unsaved.is_empty() {
        println!();
        println!(
            "{}",
            style("Rows not saved (extracted data kept in the outputs):").yellow()
        );
        for result in &unsaved {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.store_error.as_deref().unwrap_or("unknown error")
            );
        }
    }

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

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "company",
        "name",
        "phone",
        "email",
        "missing_fields",
        "saved",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            let record = &extraction.result.record;
            let missing = record
                .missing_fields()
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let status = if extraction.no_text_detected() {
                "no_text"
            } else {
                "success"
            };
            wtr.write_record([
                filename,
                status,
                &record.company,
                &record.name,
                &record.phone,
                &record.email,
                &missing,
                if result.saved { "yes" } else { "no" },
                &result.processing_time_ms.to_string(),
                result.store_error.as_deref().unwrap_or(""),
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "no",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
