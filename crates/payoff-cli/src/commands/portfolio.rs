use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::portfolio::holdings::{self, PortfolioValuationInput};
use payoff_core::portfolio::purchase::{self, ExistingHolding, PurchaseInput, PurchaseType};

use super::resolve_input;

/// Arguments for portfolio valuation
#[derive(Args)]
pub struct PortfolioValueArgs {
    /// Path to JSON/YAML file with a `holdings` array
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for sizing a purchase and merging it into a holding
#[derive(Args)]
pub struct AddHoldingArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Ticker symbol
    #[arg(long)]
    pub symbol: Option<String>,

    /// Purchase by share count or by cash amount
    #[arg(long = "type", value_enum, default_value = "shares")]
    pub purchase_type: PurchaseKind,

    /// Shares to buy (type = shares)
    #[arg(long, default_value = "0")]
    pub quantity: Decimal,

    /// Cash to invest (type = dollars)
    #[arg(long, default_value = "0")]
    pub amount: Decimal,

    /// Quote to buy at
    #[arg(long)]
    pub current_price: Option<Decimal>,

    /// Shares already held
    #[arg(long)]
    pub existing_shares: Option<Decimal>,

    /// Average cost of shares already held
    #[arg(long)]
    pub existing_entry_price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PurchaseKind {
    Shares,
    Dollars,
}

impl From<PurchaseKind> for PurchaseType {
    fn from(k: PurchaseKind) -> Self {
        match k {
            PurchaseKind::Shares => PurchaseType::Shares,
            PurchaseKind::Dollars => PurchaseType::Dollars,
        }
    }
}

impl AddHoldingArgs {
    fn from_flags(&self) -> Option<PurchaseInput> {
        let existing = match (self.existing_shares, self.existing_entry_price) {
            (Some(shares), Some(entry_price)) => Some(ExistingHolding {
                shares,
                entry_price,
            }),
            _ => None,
        };
        Some(PurchaseInput {
            symbol: self.symbol.clone()?,
            purchase_type: self.purchase_type.into(),
            quantity: self.quantity,
            amount: self.amount,
            current_price: self.current_price?,
            existing,
        })
    }
}

pub fn run_portfolio_value(args: PortfolioValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pv_input: PortfolioValuationInput =
        resolve_input(args.input.as_deref(), None, "portfolio valuation")?;
    let result = holdings::value_portfolio(&pv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_add_holding(args: AddHoldingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let buy_input = resolve_input(args.input.as_deref(), args.from_flags(), "add holding")?;
    let result = purchase::plan_purchase(&buy_input)?;
    Ok(serde_json::to_value(result)?)
}
