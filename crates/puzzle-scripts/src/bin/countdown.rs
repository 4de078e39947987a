//! CLI entry point for the countdown search.
//!
//! Usage:
//!   countdown <bag> <num> [options]
//!
//! Options:
//!   --exhaustive  Keep searching after an exact hit
//!   --json        Print a JSON report instead of the bare value

use clap::Parser;
use log::info;

use puzzle_scripts::{solve, Bag, SolverConfig};

#[derive(Parser)]
#[command(name = "countdown")]
#[command(about = "Find the expression over a bag of tiles closest to a target")]
#[command(version)]
struct Cli {
    /// Digits 0-9 and operators +-*/ in any order
    #[arg(allow_hyphen_values = true)]
    bag: String,

    /// Target number
    #[arg(allow_negative_numbers = true)]
    num: i64,

    /// Keep searching after an exact hit
    #[arg(long)]
    exhaustive: bool,

    /// Print a JSON report instead of the bare value
    #[arg(long)]
    json: bool,
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();

    let bag = match Bag::parse(&cli.bag) {
        Ok(bag) => bag,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "bag has {} digit(s) and {} operator(s) {}",
        bag.digits.total(),
        bag.operators.total(),
        bag.operators
    );

    let config = SolverConfig {
        stop_at_exact: !cli.exhaustive,
    };

    let solution = match solve(&bag, cli.num, &config) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!("{} = {}", solution.expression, solution.value);

    if cli.json {
        match serde_json::to_string_pretty(&solution) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", solution.value);
    }
}
