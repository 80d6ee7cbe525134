//! Process command - turn invoice files into one spreadsheet.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use nfe_core::{
    BatchProcessor, BatchReport, COLUMNS, Document, DocumentOutcome, ErrorPolicy, NfeConfig,
    NfeError, ResultTable, XlsxExporter,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input files or glob patterns, processed in the given order
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: configured file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Skip documents that fail instead of aborting
    #[arg(long)]
    continue_on_error: bool,

    /// Also write a per-document CSV report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// CSV with the same columns
    Csv,
    /// JSON array of rows
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No XML files found for: {}", args.inputs.join(", "));
    }

    info!("Found {} XML files", files.len());

    let documents = files
        .iter()
        .map(|path| Document::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut processor = BatchProcessor::from_config(&config);
    if args.continue_on_error {
        processor = processor.with_policy(ErrorPolicy::Skip);
    }

    let result = processor.process_with_progress(documents, |name, outcome| {
        debug!("{}: {:?}", name, outcome);
        pb.inc(1);
    });
    pb.finish_and_clear();
    let (table, report) = result?;

    if let Some(report_path) = &args.report {
        write_report(report_path, &report)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    print_failures(&report);

    if table.is_empty() {
        return Err(NfeError::EmptyResult.into());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config, args.format));

    match args.format {
        OutputFormat::Xlsx => XlsxExporter::from_config(&config.output).save(&table, &output_path)?,
        OutputFormat::Csv => write_csv(&output_path, &table)?,
        OutputFormat::Json => std::fs::write(&output_path, serde_json::to_string_pretty(table.rows())?)?,
    }

    println!(
        "{} Wrote {} rows from {} invoices to {}",
        style("✓").green(),
        table.len(),
        report.processed(),
        output_path.display()
    );
    debug!(
        "Batch took {}ms, total {:?}",
        (report.finished_at - report.started_at).num_milliseconds(),
        start.elapsed()
    );

    Ok(())
}

/// Expand each input as a literal file or a glob pattern, keeping `.xml` files.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let matched: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_xml(p))
            .collect();
        if matched.is_empty() {
            debug!("No XML files matched {}", input);
        }
        files.extend(matched);
    }

    Ok(files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

fn default_output_path(config: &NfeConfig, format: OutputFormat) -> PathBuf {
    PathBuf::from(&config.output.file_name).with_extension(format.extension())
}

fn write_csv(path: &Path, table: &ResultTable) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(COLUMNS)?;
    for row in table.rows() {
        wtr.write_record(row.to_record())?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_report(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["document", "status", "rows", "error"])?;
    for (name, outcome) in &report.documents {
        let (status, rows, error) = match outcome {
            DocumentOutcome::Processed { rows } => ("processed", rows.to_string(), ""),
            DocumentOutcome::NotInvoice => ("not_invoice", String::new(), ""),
            DocumentOutcome::Failed { error } => ("failed", String::new(), error.as_str()),
        };
        wtr.write_record([name.as_str(), status, rows.as_str(), error])?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_failures(report: &BatchReport) {
    let failed: Vec<_> = report
        .documents
        .iter()
        .filter_map(|(name, outcome)| match outcome {
            DocumentOutcome::Failed { error } => Some((name, error)),
            _ => None,
        })
        .collect();

    if failed.is_empty() {
        return;
    }

    println!("{}", style("Skipped files:").red());
    for (name, error) in failed {
        println!("  - {}: {}", name, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_follows_format() {
        let config = NfeConfig::default();
        assert_eq!(
            default_output_path(&config, OutputFormat::Xlsx),
            PathBuf::from("notas_fiscais.xlsx")
        );
        assert_eq!(
            default_output_path(&config, OutputFormat::Csv),
            PathBuf::from("notas_fiscais.csv")
        );
    }

    #[test]
    fn test_expand_inputs_filters_xml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xml"), "<a/>").unwrap();
        std::fs::write(dir.path().join("a.XML"), "<a/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let files = expand_inputs(&[pattern]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.XML", "b.xml"]);
    }
}
