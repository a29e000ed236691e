use std::path::PathBuf;

use clap::Parser;
use torneros_tools::config::MergeConfig;
use torneros_tools::{Result, ToolError, pipeline};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    let summary_path = cli.summary.clone();
    let config = cli.into_config();
    let summary = pipeline::run(&config)?;

    if let Some(path) = summary_path {
        std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
    }
    println!(
        "SUCCESS! Unified file created: {}",
        summary.output.display()
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge the Students and Grades reports into one anonymised workbook."
)]
struct Cli {
    /// Students report to read.
    #[arg(long)]
    students: Option<PathBuf>,

    /// Grades report to read.
    #[arg(long)]
    grades: Option<PathBuf>,

    /// Unified workbook to write.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Width of generated student identifiers.
    #[arg(long)]
    id_digits: Option<u32>,

    /// Seed for reproducible synthetic values.
    #[arg(long)]
    seed: Option<u64>,

    /// Optional path receiving the run summary as JSON.
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> MergeConfig {
        let defaults = MergeConfig::default();
        MergeConfig {
            students_path: self.students.unwrap_or(defaults.students_path),
            grades_path: self.grades.unwrap_or(defaults.grades_path),
            output_path: self.output.unwrap_or(defaults.output_path),
            id_digits: self.id_digits.unwrap_or(defaults.id_digits),
            seed: self.seed,
            ..defaults
        }
    }
}
