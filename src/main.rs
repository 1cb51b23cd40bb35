use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use evalnat_tools::config::LayoutConfig;
use evalnat_tools::extract::{Extraction, UnitOutcome};
use evalnat_tools::{ExtractError, Result, ingest};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ExtractError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract(args) => execute_extract(args),
    }
}

fn execute_extract(args: ExtractArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ExtractError::MissingInput(args.input));
    }

    let config = match &args.layout {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };

    let extraction = match args.from {
        SourceFormat::Csv => ingest::extract_flat_files(&args.input, &config, args.parallel)?,
        SourceFormat::Excel => ingest::extract_workbook(&args.input, &config, args.parallel)?,
    };
    print_summary(&extraction);

    if let Some(output) = &args.output {
        ingest::write_registry(output, &extraction.registry)?;
    }
    Ok(())
}

fn print_summary(extraction: &Extraction) {
    for outcome in &extraction.report.outcomes {
        match outcome {
            UnitOutcome::Accepted(summary) => println!(
                "{}: {} competencies ({} guessed), {} rows, {} with results",
                summary.unit,
                summary.spans,
                summary.heuristic_spans,
                summary.rows,
                summary.rows_with_results
            ),
            UnitOutcome::Rejected(error) => println!("skipped {error}"),
        }
    }
    println!("{} schools extracted", extraction.registry.len());
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract per-school competency results from national evaluation exports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract competency percentages into a school registry.
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Source representation.
    #[arg(long, value_enum)]
    from: SourceFormat,

    /// Directory of flat files, or workbook path.
    #[arg(long)]
    input: PathBuf,

    /// Optional export path; `.xlsx` writes a workbook, anything else JSON.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding the default layout search windows.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Process source units concurrently.
    #[arg(long)]
    parallel: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SourceFormat {
    Csv,
    Excel,
}
