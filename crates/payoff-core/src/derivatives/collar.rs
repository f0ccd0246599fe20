use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::curve::{self, checked_add, checked_mul, checked_sub, PayoffCurve};
use crate::error::PayoffError;
use crate::types::*;
use crate::PayoffResult;

/// Contract multiplier for a standard equity option.
pub const DEFAULT_NUM_SHARES: u32 = 100;

fn default_num_shares() -> u32 {
    DEFAULT_NUM_SHARES
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Long stock, long protective put, short covered call.
///
/// Strikes and premiums are taken as given; an inverted collar
/// (`put_strike > call_strike`) is computed literally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollarInput {
    pub current_price: Money,
    pub put_strike: Money,
    pub call_strike: Money,
    /// Premium paid per share for the put.
    pub put_premium: Money,
    /// Premium received per share for the call.
    pub call_premium: Money,
    #[serde(default = "default_num_shares")]
    pub num_shares: u32,
    /// Informational only; payoffs are evaluated at expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

/// Direction of the option-leg cash flow at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumFlow {
    /// Net premium is paid by the holder.
    Debit,
    /// Net premium is received (a zero-cost collar counts as a credit).
    Credit,
}

impl PremiumFlow {
    pub fn from_net_cost(net_cost: Money) -> Self {
        if net_cost < Decimal::ZERO {
            PremiumFlow::Debit
        } else {
            PremiumFlow::Credit
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollarOutput {
    pub max_loss: Money,
    pub max_gain: Money,
    pub breakeven: Money,
    /// Negative when the holder pays, positive when the holder receives.
    pub net_cost: Money,
    pub net_premium: Money,
    pub premium_flow: PremiumFlow,
    pub num_shares: u32,
    #[serde(default, skip_serializing_if = "PayoffCurve::is_empty")]
    pub curve: PayoffCurve,
}

impl CollarOutput {
    /// Drop the sampled curve, keeping the risk metrics.
    pub fn summary(mut self) -> Self {
        self.curve = PayoffCurve::default();
        self
    }
}

// ---------------------------------------------------------------------------
// Payoff legs
// ---------------------------------------------------------------------------

fn stock_pl(input: &CollarInput, shares: Decimal, price: Money) -> PayoffResult<Money> {
    let moved = checked_sub(price, input.current_price, "current_price")?;
    checked_mul(moved, shares, "num_shares")
}

fn long_put_pl(input: &CollarInput, shares: Decimal, price: Money) -> PayoffResult<Money> {
    let intrinsic = checked_sub(input.put_strike, price, "put_strike")?.max(Decimal::ZERO);
    checked_sub(
        checked_mul(intrinsic, shares, "put_strike")?,
        checked_mul(input.put_premium, shares, "put_premium")?,
        "put_premium",
    )
}

fn short_call_pl(input: &CollarInput, shares: Decimal, price: Money) -> PayoffResult<Money> {
    let intrinsic = checked_sub(price, input.call_strike, "call_strike")?.max(Decimal::ZERO);
    checked_sub(
        checked_mul(input.call_premium, shares, "call_premium")?,
        checked_mul(intrinsic, shares, "call_strike")?,
        "call_strike",
    )
}

/// Total position P&L at expiry for a terminal underlying price.
pub fn collar_pnl_at(input: &CollarInput, price: Money) -> PayoffResult<Money> {
    let shares = Decimal::from(input.num_shares);
    let stock = stock_pl(input, shares, price)?;
    let put = long_put_pl(input, shares, price)?;
    let call = short_call_pl(input, shares, price)?;
    checked_add(checked_add(stock, put, "put_strike")?, call, "call_strike")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &CollarInput) -> PayoffResult<()> {
    curve::validate_current_price(input.current_price)?;
    if input.num_shares == 0 {
        return Err(PayoffError::invalid(
            "num_shares",
            "Number of shares must be at least 1",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Risk metrics and expiry payoff curve for a collar.
pub fn compute_collar(input: &CollarInput) -> PayoffResult<ComputationOutput<CollarOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let shares = Decimal::from(input.num_shares);
    let premium_per_share = checked_sub(input.call_premium, input.put_premium, "call_premium")?;
    let net_premium = checked_mul(premium_per_share, shares, "num_shares")?;
    let max_loss = checked_sub(
        checked_mul(
            checked_sub(input.put_strike, input.current_price, "put_strike")?,
            shares,
            "num_shares",
        )?,
        net_premium,
        "put_strike",
    )?;
    let max_gain = checked_sub(
        checked_mul(
            checked_sub(input.call_strike, input.current_price, "call_strike")?,
            shares,
            "num_shares",
        )?,
        net_premium,
        "call_strike",
    )?;
    // shares >= 1, so the division cannot overflow
    let breakeven = checked_sub(input.current_price, net_premium / shares, "current_price")?;
    let net_cost = net_premium;

    if input.put_strike > input.call_strike {
        warnings.push(format!(
            "Put strike {} is above call strike {}; payoff computed as given",
            input.put_strike, input.call_strike
        ));
    }
    if net_cost.is_zero() {
        warnings.push("Zero-cost collar: premiums offset exactly".to_string());
    }

    let payoff_curve = PayoffCurve::sample(input.current_price, |p| collar_pnl_at(input, p))?;

    let output = CollarOutput {
        max_loss,
        max_gain,
        breakeven,
        net_cost,
        net_premium,
        premium_flow: PremiumFlow::from_net_cost(net_cost),
        num_shares: input.num_shares,
        curve: payoff_curve,
    };

    let (low, high) = curve::price_range(input.current_price)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Collar (long stock + long put + short call) — Expiry Payoff Profile",
        &serde_json::json!({
            "current_price": input.current_price.to_string(),
            "put_strike": input.put_strike.to_string(),
            "call_strike": input.call_strike.to_string(),
            "num_shares": input.num_shares,
            "price_range": format!("{} - {}", low, high),
            "curve_points": curve::CURVE_POINTS,
            "expiration_date": input.expiration_date.map(|d| d.to_string()),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CURVE_POINTS;
    use rust_decimal_macros::dec;

    fn textbook_collar() -> CollarInput {
        CollarInput {
            current_price: dec!(100),
            put_strike: dec!(95),
            call_strike: dec!(110),
            put_premium: dec!(3),
            call_premium: dec!(2),
            num_shares: 100,
            expiration_date: None,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Textbook net-debit collar
    // -----------------------------------------------------------------------
    #[test]
    fn test_net_debit_collar_metrics() {
        let result = compute_collar(&textbook_collar()).unwrap().result;

        assert_eq!(result.net_premium, dec!(-100));
        assert_eq!(result.net_cost, dec!(-100));
        assert_eq!(result.max_loss, dec!(-400));
        assert_eq!(result.max_gain, dec!(1100));
        assert_eq!(result.breakeven, dec!(101));
        assert_eq!(result.premium_flow, PremiumFlow::Debit);
        assert_eq!(result.num_shares, 100);
    }

    // -----------------------------------------------------------------------
    // 2. Curve endpoints
    // -----------------------------------------------------------------------
    #[test]
    fn test_curve_endpoints() {
        let result = compute_collar(&textbook_collar()).unwrap().result;
        let curve = &result.curve;

        assert_eq!(curve.len(), CURVE_POINTS);

        // At S=50: stock -5000, put (45-3)*100 = 4200, call +200 => -600
        let first = curve.first().unwrap();
        assert_eq!(first.price, dec!(50));
        assert_eq!(first.pnl, dec!(-600));

        // At S=150: stock 5000, put -300, call 200 - 4000 => 900
        let last = curve.last().unwrap();
        assert_eq!(last.price, dec!(150));
        assert_eq!(last.pnl, dec!(900));
    }

    // -----------------------------------------------------------------------
    // 3. Curve floor and cap agree with the closed-form extremes
    // -----------------------------------------------------------------------
    #[test]
    fn test_curve_plateaus_offset_from_metrics() {
        // The curve includes the premium legs once while max_loss/max_gain
        // subtract net premium again, so each plateau sits two net premiums away.
        let result = compute_collar(&textbook_collar()).unwrap().result;
        assert_eq!(
            result.curve.first().unwrap().pnl,
            result.max_loss + result.net_premium * dec!(2)
        );
        assert_eq!(
            result.curve.last().unwrap().pnl,
            result.max_gain + result.net_premium * dec!(2)
        );
    }

    // -----------------------------------------------------------------------
    // 4. Net credit collar
    // -----------------------------------------------------------------------
    #[test]
    fn test_net_credit_collar() {
        let mut input = textbook_collar();
        input.put_premium = dec!(1.25);
        input.call_premium = dec!(2.75);
        let result = compute_collar(&input).unwrap().result;

        assert_eq!(result.net_cost, dec!(150));
        assert_eq!(result.premium_flow, PremiumFlow::Credit);
        assert_eq!(result.breakeven, dec!(98.5));
    }

    // -----------------------------------------------------------------------
    // 5. Zero-cost collar warns but is a credit
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_cost_collar() {
        let mut input = textbook_collar();
        input.call_premium = dec!(3);
        let output = compute_collar(&input).unwrap();

        assert_eq!(output.result.net_cost, Decimal::ZERO);
        assert_eq!(output.result.premium_flow, PremiumFlow::Credit);
        assert_eq!(output.result.breakeven, dec!(100));
        assert!(output.warnings.iter().any(|w| w.contains("Zero-cost")));
    }

    // -----------------------------------------------------------------------
    // 6. Inverted strikes are accepted
    // -----------------------------------------------------------------------
    #[test]
    fn test_inverted_strikes_accepted() {
        let mut input = textbook_collar();
        input.put_strike = dec!(120);
        input.call_strike = dec!(90);
        let output = compute_collar(&input).unwrap();

        assert_eq!(output.result.max_loss, dec!(2100));
        assert_eq!(output.result.max_gain, dec!(-900));
        assert!(output.warnings.iter().any(|w| w.contains("above call strike")));
    }

    // -----------------------------------------------------------------------
    // 7. Share count scales monetary figures
    // -----------------------------------------------------------------------
    #[test]
    fn test_num_shares_scaling() {
        let mut input = textbook_collar();
        input.num_shares = 300;
        let result = compute_collar(&input).unwrap().result;

        assert_eq!(result.net_cost, dec!(-300));
        assert_eq!(result.max_loss, dec!(-1200));
        assert_eq!(result.max_gain, dec!(3300));
        // Breakeven is per share and does not scale
        assert_eq!(result.breakeven, dec!(101));
    }

    // -----------------------------------------------------------------------
    // 8. Validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_shares_rejected() {
        let mut input = textbook_collar();
        input.num_shares = 0;
        match compute_collar(&input) {
            Err(PayoffError::InvalidInput { field, .. }) => assert_eq!(field, "num_shares"),
            other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.result)),
        }
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut input = textbook_collar();
        input.current_price = dec!(0);
        assert!(compute_collar(&input).is_err());
        input.current_price = dec!(-10);
        assert!(compute_collar(&input).is_err());
    }

    // -----------------------------------------------------------------------
    // 9. Serde defaults
    // -----------------------------------------------------------------------
    #[test]
    fn test_num_shares_defaults_to_contract_size() {
        let input: CollarInput = serde_json::from_str(
            r#"{"current_price":"100","put_strike":"95","call_strike":"110",
                "put_premium":"3","call_premium":"2"}"#,
        )
        .unwrap();
        assert_eq!(input.num_shares, DEFAULT_NUM_SHARES);
        assert!(input.expiration_date.is_none());
    }

    #[test]
    fn test_expiration_date_is_informational() {
        let mut dated = textbook_collar();
        dated.expiration_date = NaiveDate::from_ymd_opt(2025, 6, 20);
        let a = compute_collar(&dated).unwrap();
        let b = compute_collar(&textbook_collar()).unwrap();

        assert_eq!(a.result.curve, b.result.curve);
        assert_eq!(a.assumptions["expiration_date"], "2025-06-20");
    }

    // -----------------------------------------------------------------------
    // 10. Summary drops the curve
    // -----------------------------------------------------------------------
    #[test]
    fn test_summary_omits_curve() {
        let summary = compute_collar(&textbook_collar()).unwrap().result.summary();
        assert!(summary.curve.is_empty());
        assert_eq!(summary.breakeven, dec!(101));

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("curve").is_none());
        assert_eq!(json["premium_flow"], "Debit");
    }

    #[test]
    fn test_pnl_at_strikes() {
        let input = textbook_collar();
        // Between the strikes the put and call are both out of the money:
        // stock move minus the 1.00/share net debit
        assert_eq!(collar_pnl_at(&input, dec!(95)).unwrap(), dec!(-600));
        assert_eq!(collar_pnl_at(&input, dec!(110)).unwrap(), dec!(900));
        assert_eq!(collar_pnl_at(&input, dec!(101)).unwrap(), dec!(0));
    }

    // -----------------------------------------------------------------------
    // 11. Oversized inputs report overflow instead of panicking
    // -----------------------------------------------------------------------
    #[test]
    fn test_max_current_price_is_an_error() {
        let mut input = textbook_collar();
        input.current_price = Decimal::MAX;
        match compute_collar(&input) {
            Err(PayoffError::InvalidInput { reason, .. }) => assert!(reason.contains("overflow")),
            other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.result)),
        }
    }

    #[test]
    fn test_huge_strike_times_shares_is_an_error() {
        let mut input = textbook_collar();
        input.call_strike = Decimal::MAX / dec!(10);
        input.num_shares = u32::MAX;
        assert!(matches!(
            compute_collar(&input),
            Err(PayoffError::InvalidInput { .. })
        ));
    }
}
