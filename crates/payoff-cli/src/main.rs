mod commands;
mod context;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process;

use commands::market::SearchArgs;
use commands::payoff::{ChartArgs, CollarArgs, FuturesArgs};
use commands::portfolio::{AddHoldingArgs, PortfolioValueArgs};
use context::AppContext;

/// Collar and futures payoff diagrams
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Collar and futures payoff diagrams",
    long_about = "Computes expiry payoff profiles for option collars and futures positions \
                  with decimal precision, emits chart data for an external renderer, \
                  and provides ticker search and portfolio holding arithmetic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Newline-delimited ticker list used by `search`
    #[arg(long, env = "PAYOFF_TICKERS", default_value = "tickers.txt", global = true)]
    tickers: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Collar (long stock, long put, short call) payoff and risk metrics
    Collar(CollarArgs),
    /// Futures contract payoff and risk metrics
    Futures(FuturesArgs),
    /// Payoff curve plus reference lines for charting
    Chart(ChartArgs),
    /// Search the ticker list by prefix or exact symbol
    Search(SearchArgs),
    /// Mark portfolio holdings to market
    PortfolioValue(PortfolioValueArgs),
    /// Size a purchase and merge it into an existing holding
    AddHolding(AddHoldingArgs),
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
    let cli = Cli::parse();

    let ctx = AppContext::load(&cli.tickers);
    // best effort
    let _ = ctx.write_warnings(&mut io::stderr());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Collar(args) => commands::payoff::run_collar(args),
        Commands::Futures(args) => commands::payoff::run_futures(args),
        Commands::Chart(args) => commands::payoff::run_chart(args),
        Commands::Search(args) => commands::market::run_search(args, &ctx),
        Commands::PortfolioValue(args) => commands::portfolio::run_portfolio_value(args),
        Commands::AddHolding(args) => commands::portfolio::run_add_holding(args),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
