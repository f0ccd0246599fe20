//! Chart data for an external renderer.
//!
//! Nothing here draws. A `ChartSpec` carries the sampled curve plus the
//! vertical reference lines a payoff diagram is annotated with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::curve::PayoffCurve;
use crate::derivatives::collar::{CollarInput, CollarOutput};
use crate::derivatives::futures::{FuturesInput, FuturesOutput};
use crate::types::Money;

const X_LABEL: &str = "Future Stock Price ($)";
const Y_LABEL: &str = "Net Profit/Loss ($)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    CurrentPrice,
    Breakeven,
    PutStrike,
    CallStrike,
    FuturesPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub kind: ReferenceKind,
    pub label: String,
    pub price: Money,
}

impl ReferenceLine {
    fn new(kind: ReferenceKind, caption: &str, price: Money) -> Self {
        ReferenceLine {
            kind,
            label: format!("{}: ${}", caption, price),
            price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Horizontal line at zero P&L.
    pub zero_line: bool,
    pub reference_lines: Vec<ReferenceLine>,
    pub points: PayoffCurve,
}

fn two_places(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Collar diagram: curve plus current price, breakeven and both strikes.
pub fn collar_chart(output: &CollarOutput, input: &CollarInput) -> ChartSpec {
    let breakeven = ReferenceLine {
        kind: ReferenceKind::Breakeven,
        label: format!("Breakeven: ${:.2}", two_places(output.breakeven)),
        price: output.breakeven,
    };

    ChartSpec {
        title: "Collar Strategy Payoff Diagram".to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        zero_line: true,
        reference_lines: vec![
            ReferenceLine::new(ReferenceKind::CurrentPrice, "Current Price", input.current_price),
            breakeven,
            ReferenceLine::new(ReferenceKind::PutStrike, "Put Strike", input.put_strike),
            ReferenceLine::new(ReferenceKind::CallStrike, "Call Strike", input.call_strike),
        ],
        points: output.curve.clone(),
    }
}

/// Futures diagram: curve plus current price and the contracted price.
pub fn futures_chart(output: &FuturesOutput, input: &FuturesInput) -> ChartSpec {
    ChartSpec {
        title: "Futures Contract Payoff Diagram".to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        zero_line: true,
        reference_lines: vec![
            ReferenceLine::new(ReferenceKind::CurrentPrice, "Current Price", input.current_price),
            ReferenceLine::new(ReferenceKind::FuturesPrice, "Breakeven", output.breakeven),
        ],
        points: output.curve.clone(),
    }
}
