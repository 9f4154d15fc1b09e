//! Process command - extract rows from a single document.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docstruct_core::export::Sink;
use docstruct_core::models::config::{DocstructConfig, Engine};
use docstruct_core::{DocstructError, Pipeline, RunOutput};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (text or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Tabular output file (.xlsx or .csv)
    #[arg(short, long)]
    table: PathBuf,

    /// JSON output file
    #[arg(short, long)]
    json: PathBuf,

    /// Extraction engine
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

    /// Custom rule file (JSON) for the rules engine
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Structured response file (JSON) for the structured engine
    #[arg(long)]
    response: Option<PathBuf>,

    /// Expected number of rows, for the completeness check
    #[arg(long)]
    expected: Option<usize>,

    /// Match rules against the text as-is, without collapsing whitespace
    #[arg(long)]
    raw_whitespace: bool,

    /// Number of rows to preview
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum EngineArg {
    /// Pattern rules applied to the document text
    Rules,
    /// Pre-built structured response
    Structured,
}

impl From<EngineArg> for Engine {
    fn from(engine: EngineArg) -> Self {
        match engine {
            EngineArg::Rules => Engine::Rules,
            EngineArg::Structured => Engine::Structured,
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args);

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pipeline = Pipeline::from_config(&config.extraction)?;

    info!("Processing file: {}", args.input.display());

    let mut output = match pipeline.run_file(&args.input) {
        Ok(output) => output,
        Err(DocstructError::EmptyInput) => {
            anyhow::bail!("Input document {} is empty; no output written", args.input.display())
        }
        Err(e) => return Err(e.into()),
    };

    print_summary(&output, pipeline.extractor_name());
    print_preview(&output, args.preview);

    for entry in output.log.issues() {
        eprintln!("{} {}", style("!").yellow(), entry);
    }

    let sinks = [Sink::Tabular(args.table.clone()), Sink::Json(args.json.clone())];
    let report = pipeline.export(&output.rows, &sinks, &config.export, &mut output.log);

    for path in &report.written {
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    }
    for (_, error) in &report.failed {
        eprintln!("{} {}", style("✗").red(), error);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} outputs could not be written",
            report.failed.len(),
            sinks.len()
        );
    }

    Ok(())
}

fn apply_overrides(config: &mut DocstructConfig, args: &ProcessArgs) {
    let extraction = &mut config.extraction;

    if let Some(engine) = args.engine {
        extraction.engine = engine.into();
    }
    if let Some(rules) = &args.rules {
        extraction.rules_file = Some(rules.clone());
    }
    if let Some(response) = &args.response {
        extraction.response_file = Some(response.clone());
    }
    if args.expected.is_some() {
        extraction.expected_rows = args.expected;
    }
    if args.raw_whitespace {
        extraction.normalize_whitespace = false;
    }
}

fn print_summary(output: &RunOutput, engine: &str) {
    let summary = &output.summary;

    println!(
        "{} Extracted {} rows with the {} engine",
        style("✓").green(),
        summary.total_rows,
        engine
    );

    if let (Some(matched), Some(unmatched)) = (summary.matched, summary.unmatched) {
        println!(
            "{} Rules matched: {}, unmatched: {}, transform errors: {}",
            style("ℹ").blue(),
            matched,
            unmatched,
            summary.transform_errors
        );
    }

    if let (Some(ratio), Some(expected)) = (summary.completeness(), summary.expected_rows) {
        let status = if summary.is_complete() {
            style("COMPLETE").green()
        } else {
            style("INCOMPLETE").yellow()
        };
        println!(
            "{} Completeness: {:.1}% of {} expected rows ({})",
            style("ℹ").blue(),
            ratio * 100.0,
            expected,
            status
        );
    }
}

fn print_preview(output: &RunOutput, count: usize) {
    if count == 0 || output.rows.is_empty() {
        return;
    }

    println!();
    for row in output.rows.iter().take(count) {
        println!("   {}. {}: {}", row.sequence_number(), row.label(), row.value());
    }
    if output.rows.len() > count {
        println!("   ... and {} more rows", output.rows.len() - count);
    }
    println!();
}
