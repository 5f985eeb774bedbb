//! Map data checker
//!
//! Prints every diagnostic and exits with failure if anything was reported.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use rf_mapcheck::{CheckOptions, run};

/// Validate terrain and furniture definitions
#[derive(Parser, Debug)]
#[command(name = "rf-mapcheck")]
#[command(author, version, about = "Check map data files", long_about = None)]
struct Args {
    /// Data files or directories, loaded in order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Loader configuration (JSON)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Source tag for the loaded files (defaults to the core source)
    #[arg(short = 's', long = "source")]
    source: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = CheckOptions {
        paths: args.paths,
        config: args.config,
        source: args.source,
    };
    match run(&options) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            if let Err(err) = report.write_to(&mut io::stdout().lock()) {
                eprintln!("rf-mapcheck: {}", err);
            }
            eprintln!("{} problem(s) found", report.diagnostics.len());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("rf-mapcheck: {}", err);
            ExitCode::FAILURE
        }
    }
}
