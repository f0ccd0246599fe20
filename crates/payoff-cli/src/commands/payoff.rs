use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::chart;
use payoff_core::derivatives::collar::{self, CollarInput};
use payoff_core::derivatives::futures::{self, FuturesInput};

use super::resolve_input;

/// Arguments for the collar payoff calculator
#[derive(Args)]
pub struct CollarArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current price of the underlying
    #[arg(long)]
    pub current_price: Option<Decimal>,

    /// Strike of the protective (long) put
    #[arg(long)]
    pub put_strike: Option<Decimal>,

    /// Strike of the covered (short) call
    #[arg(long)]
    pub call_strike: Option<Decimal>,

    /// Premium paid per share for the put
    #[arg(long, default_value = "0")]
    pub put_premium: Decimal,

    /// Premium received per share for the call
    #[arg(long, default_value = "0")]
    pub call_premium: Decimal,

    /// Number of shares covered
    #[arg(long, default_value_t = collar::DEFAULT_NUM_SHARES)]
    pub num_shares: u32,

    /// Omit the sampled payoff curve
    #[arg(long)]
    pub summary_only: bool,
}

impl CollarArgs {
    fn from_flags(&self) -> Option<CollarInput> {
        Some(CollarInput {
            current_price: self.current_price?,
            put_strike: self.put_strike?,
            call_strike: self.call_strike?,
            put_premium: self.put_premium,
            call_premium: self.call_premium,
            num_shares: self.num_shares,
            expiration_date: None,
        })
    }

    fn resolve(&self) -> Result<CollarInput, Box<dyn std::error::Error>> {
        resolve_input(self.input.as_deref(), self.from_flags(), "collar payoff")
    }
}

/// Arguments for the futures payoff calculator
#[derive(Args)]
pub struct FuturesArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current price of the underlying
    #[arg(long)]
    pub current_price: Option<Decimal>,

    /// Contracted futures price
    #[arg(long)]
    pub futures_price: Option<Decimal>,

    /// Units per contract (negative for short)
    #[arg(long, allow_hyphen_values = true)]
    pub contract_size: Option<Decimal>,

    /// Omit the sampled payoff curve
    #[arg(long)]
    pub summary_only: bool,
}

impl FuturesArgs {
    fn from_flags(&self) -> Option<FuturesInput> {
        Some(FuturesInput {
            current_price: self.current_price?,
            futures_price: self.futures_price?,
            contract_size: self.contract_size?,
        })
    }

    fn resolve(&self) -> Result<FuturesInput, Box<dyn std::error::Error>> {
        resolve_input(self.input.as_deref(), self.from_flags(), "futures payoff")
    }
}

/// Chart data for a strategy
#[derive(Args)]
pub struct ChartArgs {
    #[command(subcommand)]
    pub strategy: ChartStrategy,
}

#[derive(Subcommand)]
pub enum ChartStrategy {
    /// Collar payoff diagram
    Collar(CollarArgs),
    /// Futures payoff diagram
    Futures(FuturesArgs),
}

pub fn run_collar(args: CollarArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let collar_input = args.resolve()?;
    let mut result = collar::compute_collar(&collar_input)?;
    if args.summary_only {
        result.result = result.result.summary();
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_futures(args: FuturesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fut_input = args.resolve()?;
    let mut result = futures::compute_futures(&fut_input)?;
    if args.summary_only {
        result.result = result.result.summary();
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_chart(args: ChartArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spec = match args.strategy {
        ChartStrategy::Collar(a) => {
            let collar_input = a.resolve()?;
            let output = collar::compute_collar(&collar_input)?;
            chart::collar_chart(&output.result, &collar_input)
        }
        ChartStrategy::Futures(a) => {
            let fut_input = a.resolve()?;
            let output = futures::compute_futures(&fut_input)?;
            chart::futures_chart(&output.result, &fut_input)
        }
    };
    Ok(serde_json::json!({ "result": spec }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collar_args() -> CollarArgs {
        CollarArgs {
            input: None,
            current_price: Some(Decimal::from(100)),
            put_strike: Some(Decimal::from(95)),
            call_strike: Some(Decimal::from(110)),
            put_premium: Decimal::from(3),
            call_premium: Decimal::from(2),
            num_shares: 100,
            summary_only: true,
        }
    }

    #[test]
    fn test_collar_from_flags_summary() {
        let value = run_collar(collar_args()).unwrap();
        let breakeven: Decimal = value["result"]["breakeven"].as_str().unwrap().parse().unwrap();
        assert_eq!(breakeven, Decimal::from(101));
        assert!(value["result"].get("curve").is_none());
    }

    #[test]
    fn test_chart_from_flags() {
        let mut args = collar_args();
        args.summary_only = false;
        let value = run_chart(ChartArgs {
            strategy: ChartStrategy::Collar(args),
        })
        .unwrap();
        assert_eq!(value["result"]["reference_lines"].as_array().unwrap().len(), 4);
        assert_eq!(value["result"]["points"].as_array().unwrap().len(), 100);
    }

    #[test]
    fn test_futures_flags_incomplete() {
        let args = FuturesArgs {
            input: None,
            current_price: Some(Decimal::from(100)),
            futures_price: None,
            contract_size: Some(Decimal::from(1)),
            summary_only: false,
        };
        assert!(args.from_flags().is_none());
    }
}
