use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use payoff_core::tickers::TickerUniverse;

/// State built once at process start and handed to the commands that need it.
pub struct AppContext {
    pub tickers: TickerUniverse,
    /// Problems found while building the context; printed to stderr at
    /// start-up and repeated in `search` output.
    pub ticker_warnings: Vec<String>,
}

impl AppContext {
    /// Never fails: an unreadable ticker file leaves an empty universe and a
    /// warning, so commands that do not search are unaffected.
    pub fn load(tickers_path: &Path) -> Self {
        let mut ticker_warnings = Vec::new();
        let tickers = match TickerUniverse::load(tickers_path) {
            Ok(Some(universe)) => universe,
            Ok(None) => {
                ticker_warnings.push(format!(
                    "{} not found, using empty ticker list",
                    tickers_path.display()
                ));
                TickerUniverse::default()
            }
            Err(e) => {
                ticker_warnings.push(format!(
                    "{} could not be read ({}), using empty ticker list",
                    tickers_path.display(),
                    e
                ));
                TickerUniverse::default()
            }
        };
        AppContext {
            tickers,
            ticker_warnings,
        }
    }

    pub fn write_warnings<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for w in &self.ticker_warnings {
            writeln!(out, "{}: {}", "warning".yellow().bold(), w)?;
        }
        Ok(())
    }
}
