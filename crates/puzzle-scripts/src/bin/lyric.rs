//! CLI entry point for the mirror grid validator.
//!
//! Reads a grid from stdin. Silent with exit status 0 when the grid is
//! valid; exit status 1 on the first boundary or cycle violation.
//!
//! Options:
//!   --extent-threshold <n>  Smallest extent a boundary violation needs (default: 8)
//!   --report                Print the violation as JSON before exiting

use std::io::{self, Read};

use clap::Parser;
use log::debug;

use puzzle_scripts::tracer::DEFAULT_EXTENT_THRESHOLD;
use puzzle_scripts::{validate, Grid, PuzzleError, TraceConfig};

#[derive(Parser)]
#[command(name = "lyric")]
#[command(about = "Validate a mirror grid read from stdin")]
#[command(version)]
struct Cli {
    /// Smallest grid extent along the exit direction that a boundary
    /// violation needs
    #[arg(long, default_value_t = DEFAULT_EXTENT_THRESHOLD)]
    extent_threshold: i64,

    /// Print the violation as JSON before exiting
    #[arg(long)]
    report: bool,
}

fn read_stdin() -> Result<String, PuzzleError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();

    let text = match read_stdin() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let grid = Grid::parse(&text);

    let config = TraceConfig {
        extent_threshold: cli.extent_threshold,
        ..TraceConfig::default()
    };

    if let Err(violation) = validate(&grid, &config) {
        debug!("{}", violation);
        if cli.report {
            match serde_json::to_string_pretty(&violation) {
                Ok(report) => println!("{}", report),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        std::process::exit(1);
    }
}
