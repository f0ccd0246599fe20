use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::curve::{self, checked_mul, checked_sub, PayoffCurve};
use crate::types::*;
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesInput {
    pub current_price: Money,
    /// Contracted (entry) futures price.
    pub futures_price: Money,
    /// Units per contract; negative for a short position.
    pub contract_size: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
    Flat,
}

impl PositionSide {
    pub fn from_size(contract_size: Quantity) -> Self {
        if contract_size > Decimal::ZERO {
            PositionSide::Long
        } else if contract_size < Decimal::ZERO {
            PositionSide::Short
        } else {
            PositionSide::Flat
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesOutput {
    pub breakeven: Money,
    pub pl_per_unit_move: Money,
    /// P&L at the top of the price range.
    pub max_gain: Money,
    /// P&L at the bottom of the price range.
    pub max_loss: Money,
    pub position: PositionSide,
    #[serde(default, skip_serializing_if = "PayoffCurve::is_empty")]
    pub curve: PayoffCurve,
}

impl FuturesOutput {
    /// Drop the sampled curve, keeping the risk metrics.
    pub fn summary(mut self) -> Self {
        self.curve = PayoffCurve::default();
        self
    }
}

/// Mark-to-expiry P&L for a settlement price.
pub fn futures_pnl_at(input: &FuturesInput, price: Money) -> PayoffResult<Money> {
    let moved = checked_sub(price, input.futures_price, "futures_price")?;
    checked_mul(moved, input.contract_size, "contract_size")
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Linear payoff profile for a futures position.
///
/// `max_gain` and `max_loss` are read off the upper and lower ends of the
/// price range rather than searched for, so for a short position they come
/// out swapped; a warning is attached in that case.
pub fn compute_futures(input: &FuturesInput) -> PayoffResult<ComputationOutput<FuturesOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    curve::validate_current_price(input.current_price)?;

    let (low, high) = curve::price_range(input.current_price)?;
    let position = PositionSide::from_size(input.contract_size);

    match position {
        PositionSide::Short => warnings.push(
            "Short position: max_gain is the P&L at the top of the range and is the actual \
             worst case; max_loss at the bottom of the range is the best case"
                .to_string(),
        ),
        PositionSide::Flat => {
            warnings.push("Contract size is zero; payoff is flat".to_string())
        }
        PositionSide::Long => {}
    }

    let payoff_curve = PayoffCurve::sample(input.current_price, |p| futures_pnl_at(input, p))?;

    let output = FuturesOutput {
        breakeven: input.futures_price,
        pl_per_unit_move: input.contract_size,
        max_gain: futures_pnl_at(input, high)?,
        max_loss: futures_pnl_at(input, low)?,
        position,
        curve: payoff_curve,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Futures Contract — Linear Payoff at Settlement",
        &serde_json::json!({
            "current_price": input.current_price.to_string(),
            "futures_price": input.futures_price.to_string(),
            "contract_size": input.contract_size.to_string(),
            "price_range": format!("{} - {}", low, high),
            "curve_points": curve::CURVE_POINTS,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CURVE_POINTS;
    use crate::error::PayoffError;
    use rust_decimal_macros::dec;

    fn long_contract() -> FuturesInput {
        FuturesInput {
            current_price: dec!(100),
            futures_price: dec!(100),
            contract_size: dec!(50),
        }
    }

    #[test]
    fn test_long_contract_metrics() {
        let result = compute_futures(&long_contract()).unwrap().result;

        assert_eq!(result.breakeven, dec!(100));
        assert_eq!(result.pl_per_unit_move, dec!(50));
        assert_eq!(result.max_gain, dec!(2500));
        assert_eq!(result.max_loss, dec!(-2500));
        assert_eq!(result.position, PositionSide::Long);
    }

    #[test]
    fn test_curve_endpoints_match_extremes() {
        let result = compute_futures(&long_contract()).unwrap().result;

        assert_eq!(result.curve.len(), CURVE_POINTS);
        assert_eq!(result.curve.first().unwrap().pnl, result.max_loss);
        assert_eq!(result.curve.last().unwrap().pnl, result.max_gain);
    }

    #[test]
    fn test_breakeven_is_futures_price_not_spot() {
        let input = FuturesInput {
            current_price: dec!(4200),
            futures_price: dec!(4250.25),
            contract_size: dec!(5),
        };
        let result = compute_futures(&input).unwrap().result;

        assert_eq!(result.breakeven, dec!(4250.25));
        assert_eq!(futures_pnl_at(&input, dec!(4250.25)).unwrap(), Decimal::ZERO);
        // 2100 - 4250.25 = -2150.25 per unit
        assert_eq!(result.max_loss, dec!(-10751.25));
    }

    #[test]
    fn test_short_contract_labels_are_endpoint_values() {
        let input = FuturesInput {
            contract_size: dec!(-50),
            ..long_contract()
        };
        let output = compute_futures(&input).unwrap();

        assert_eq!(output.result.position, PositionSide::Short);
        assert_eq!(output.result.max_gain, dec!(-2500));
        assert_eq!(output.result.max_loss, dec!(2500));
        assert!(output.warnings.iter().any(|w| w.starts_with("Short position")));
    }

    #[test]
    fn test_flat_contract() {
        let input = FuturesInput {
            contract_size: Decimal::ZERO,
            ..long_contract()
        };
        let output = compute_futures(&input).unwrap();

        assert_eq!(output.result.position, PositionSide::Flat);
        assert!(output.result.curve.iter().all(|p| p.pnl.is_zero()));
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let input = FuturesInput {
            current_price: dec!(0),
            ..long_contract()
        };
        assert!(matches!(
            compute_futures(&input),
            Err(PayoffError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_oversized_inputs_are_errors() {
        let input = FuturesInput {
            current_price: Decimal::MAX,
            ..long_contract()
        };
        assert!(matches!(
            compute_futures(&input),
            Err(PayoffError::InvalidInput { .. })
        ));

        let input = FuturesInput {
            futures_price: Decimal::MIN,
            contract_size: dec!(1000),
            ..long_contract()
        };
        assert!(compute_futures(&input).is_err());
    }

    #[test]
    fn test_summary_omits_curve() {
        let summary = compute_futures(&long_contract()).unwrap().result.summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("curve").is_none());
        assert_eq!(json["position"], "Long");
    }
}
