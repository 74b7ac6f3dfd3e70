//! trackclean CLI - Inspect and clean GPS track CSV files
//!
//! Usage:
//!   trackclean-cli <file.csv> [--d-or <margin>] [--d-and <margin>]
//!   trackclean-cli <file.csv> --prune [--fixed-point] [--json]
//!
//! The input is a headerless CSV with one `longitude,latitude,timestamp`
//! row per sample, in recording order. Numeric fields may be integers or
//! floats. The tool classifies every point against the configured
//! margins, optionally prunes sustained deviant runs, and prints the
//! surviving points as a text listing or JSON.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use trackclean::{Deviance, PathValidator, ValidatorConfig};

#[derive(Parser)]
#[command(name = "trackclean-cli")]
#[command(about = "Detect and prune deviant points in GPS track CSV files", long_about = None)]
struct Cli {
    /// CSV file with one longitude,latitude,timestamp row per sample
    file: PathBuf,

    /// Loose margin: flag a point when either axis delta reaches this
    #[arg(long, default_value_t = 0.005)]
    d_or: f64,

    /// Strict margin: flag a point when both axis deltas reach this
    #[arg(long, default_value_t = 0.01)]
    d_and: f64,

    /// Remove prunable deviant points after classification
    #[arg(short, long)]
    prune: bool,

    /// Repeat pruning until a pass removes nothing
    #[arg(long, requires = "prune")]
    fixed_point: bool,

    /// Emit surviving points as JSON instead of the text listing
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let rows = read_rows(&cli.file)?;

    let mut validator = PathValidator::new(ValidatorConfig {
        d_or: cli.d_or,
        d_and: cli.d_and,
        ..ValidatorConfig::default()
    });
    let loaded = validator.load(&rows)?;

    let removed = if cli.prune {
        if cli.fixed_point {
            validator.prune_to_fixed_point()
        } else {
            validator.prune()
        }
    } else {
        0
    };

    if cli.json {
        let survivors: Vec<_> = validator.iter().collect();
        println!("{}", serde_json::to_string_pretty(&survivors)?);
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    for (i, point) in validator.iter().enumerate() {
        println!("{i:4} {point}");
    }
    println!("{}", "=".repeat(60));

    let either = count_tagged(&validator, Deviance::EitherAxis);
    let both = count_tagged(&validator, Deviance::BothAxes);
    println!(
        "{} of {} points survive ({} removed, {} still flagged: {} {}, {} {})",
        loaded - removed,
        loaded,
        removed,
        either + both,
        either,
        Deviance::EitherAxis,
        both,
        Deviance::BothAxes,
    );

    Ok(())
}

fn count_tagged(validator: &PathValidator, tag: Deviance) -> usize {
    validator.iter().filter(|p| p.deviance() == tag).count()
}

/// Read raw rows from a headerless CSV file.
///
/// Every field is parsed as `f64`, covering both integer and float
/// forms. Field-count validation is left to the validator.
fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value: f64 = field
                .parse()
                .map_err(|_| format!("line {}: not a numeric field: {:?}", line + 1, field))?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(rows)
}
