mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::pricing::BreakEvenArgs;
use commands::rating::RatingArgs;
use commands::schedule::ScheduleArgs;

/// Bank loan pricing: break-even rates, repayment schedules, commercial margin
#[derive(Parser)]
#[command(
    name = "lpc",
    version,
    about = "Bank loan pricing and repayment schedules",
    long_about = "Prices a loan from its risk profile and cost of funding, builds \
                  repayment schedules for fixed, variable, bullet and custom \
                  structures, and derives the commercial margin of an offer. \
                  All arithmetic is decimal. Set RUST_LOG=debug for tracing."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Break-even lending rate from funding, capital, cost and credit risk
    BreakEven(BreakEvenArgs),
    /// Generate a repayment schedule
    Schedule(ScheduleArgs),
    /// Full pricing analysis: break-even, schedules, commercial margin
    Analyze(AnalyzeArgs),
    /// Map a PD onto the rating scale, or list the scale
    Rating(RatingArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: commands::CliResult<serde_json::Value> = match cli.command {
        Commands::BreakEven(args) => commands::pricing::run_break_even(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Rating(args) => commands::rating::run_rating(args),
        Commands::Version => {
            println!("lpc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            log_warnings(&value);
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn log_warnings(value: &serde_json::Value) {
    if let Some(warnings) = value.get("warnings").and_then(|w| w.as_array()) {
        for w in warnings.iter().filter_map(|w| w.as_str()) {
            log::warn!("{w}");
        }
    }
    if let Some(us) = value.pointer("/metadata/computation_time_us") {
        log::debug!("computed in {us}us");
    }
}
