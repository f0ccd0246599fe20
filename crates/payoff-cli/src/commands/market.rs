use clap::Args;
use serde_json::Value;

use payoff_core::tickers::{TickerQuery, DEFAULT_SEARCH_LIMIT};
use payoff_core::with_metadata;

use crate::context::AppContext;

/// Arguments for ticker search
#[derive(Args)]
pub struct SearchArgs {
    /// Ticker symbol or prefix
    #[arg(long, short)]
    pub q: String,

    /// Maximum number of prefix matches
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,

    /// Only return an exact symbol match
    #[arg(long)]
    pub exact: bool,
}

pub fn run_search(args: SearchArgs, ctx: &AppContext) -> Result<Value, Box<dyn std::error::Error>> {
    let query = TickerQuery {
        q: args.q,
        limit: args.limit,
        exact: args.exact,
    };
    let result = ctx.tickers.search(&query)?;
    let output = with_metadata(
        "Ticker Prefix Search",
        &serde_json::json!({
            "universe_size": ctx.tickers.len(),
            "limit": query.limit,
            "exact": query.exact,
        }),
        ctx.ticker_warnings.clone(),
        0,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use payoff_core::tickers::TickerUniverse;

    #[test]
    fn test_search_uses_context_universe() {
        let ctx = AppContext {
            tickers: TickerUniverse::new(["SPY", "SPXL", "QQQ"]),
            ticker_warnings: vec![],
        };
        let value = run_search(
            SearchArgs {
                q: "sp".into(),
                limit: 10,
                exact: false,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(value["result"]["matches"], serde_json::json!(["SPY", "SPXL"]));
        assert_eq!(value["assumptions"]["universe_size"], 3);
    }
}
