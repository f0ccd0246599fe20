use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PayoffError;
use crate::types::*;
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A stored holding plus whatever quote the market-data provider returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingPosition {
    #[serde(default)]
    pub id: Option<String>,
    pub symbol: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub shares: Quantity,
    /// Average cost per share.
    #[serde(default)]
    pub entry_price: Option<Money>,
    /// Last price persisted with the holding.
    #[serde(default)]
    pub stored_price: Option<Money>,
    /// Fresh quote, if the provider answered.
    #[serde(default)]
    pub market_price: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuationInput {
    pub holdings: Vec<HoldingPosition>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    Market,
    Stored,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub id: Option<String>,
    pub symbol: String,
    pub name: String,
    pub quantity: Quantity,
    pub average_price: Money,
    pub current_price: Money,
    pub price_source: PriceSource,
    pub total_value: Money,
    pub gain_loss: Money,
    pub gain_loss_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total_value: Money,
    pub total_invested: Money,
    pub total_gain_loss: Money,
    pub total_gain_loss_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuationOutput {
    pub holdings: Vec<HoldingValuation>,
    pub stats: PortfolioStats,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gain as a percentage of the amount invested; zero when nothing was invested.
fn percent_of(gain: Money, invested: Money) -> Decimal {
    if invested > Decimal::ZERO {
        gain / invested * dec!(100)
    } else {
        Decimal::ZERO
    }
}

fn resolve_price(holding: &HoldingPosition) -> (Money, PriceSource) {
    match (holding.market_price, holding.stored_price) {
        (Some(p), _) => (p, PriceSource::Market),
        (None, Some(p)) => (p, PriceSource::Stored),
        (None, None) => (Decimal::ZERO, PriceSource::Missing),
    }
}

fn value_holding(holding: &HoldingPosition) -> (HoldingValuation, Money) {
    let (current_price, price_source) = resolve_price(holding);
    let average_price = holding.entry_price.unwrap_or(Decimal::ZERO);

    let total_value = holding.shares * current_price;
    let invested = holding.shares * average_price;
    let gain_loss = total_value - invested;

    let valuation = HoldingValuation {
        id: holding.id.clone(),
        symbol: holding.symbol.clone(),
        name: holding
            .company_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| holding.symbol.clone()),
        quantity: holding.shares,
        average_price,
        current_price,
        price_source,
        total_value,
        gain_loss,
        gain_loss_percent: percent_of(gain_loss, invested),
    };
    (valuation, invested)
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Mark every holding to its best available price and aggregate.
pub fn value_portfolio(
    input: &PortfolioValuationInput,
) -> PayoffResult<ComputationOutput<PortfolioValuationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (i, h) in input.holdings.iter().enumerate() {
        if h.shares < Decimal::ZERO {
            return Err(PayoffError::InvalidInput {
                field: format!("holdings[{}].shares", i),
                reason: "Share count cannot be negative".into(),
            });
        }
    }

    let mut holdings = Vec::with_capacity(input.holdings.len());
    let mut total_value = Decimal::ZERO;
    let mut total_invested = Decimal::ZERO;

    for h in &input.holdings {
        let (valuation, invested) = value_holding(h);
        match valuation.price_source {
            PriceSource::Stored => warnings.push(format!(
                "{}: no market quote, using stored price {}",
                h.symbol, valuation.current_price
            )),
            PriceSource::Missing => {
                warnings.push(format!("{}: no price available, valued at zero", h.symbol))
            }
            PriceSource::Market => {}
        }
        total_value += valuation.total_value;
        total_invested += invested;
        holdings.push(valuation);
    }

    let total_gain_loss = total_value - total_invested;
    let stats = PortfolioStats {
        total_value,
        total_invested,
        total_gain_loss,
        total_gain_loss_percent: percent_of(total_gain_loss, total_invested),
    };

    let output = PortfolioValuationOutput { holdings, stats };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio Mark-to-Market",
        &serde_json::json!({
            "num_holdings": input.holdings.len(),
            "price_priority": "market, stored, zero",
        }),
        warnings,
        elapsed,
        output,
    ))
}
