//! Sampled profit/loss curves over a fixed price grid.
//!
//! Every strategy in this crate is evaluated on the same grid: `CURVE_POINTS`
//! prices spaced evenly from half to one-and-a-half times the current price,
//! both endpoints included.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::types::Money;
use crate::PayoffResult;

/// Number of samples in every payoff curve.
pub const CURVE_POINTS: usize = 100;

/// Lower bound of the grid as a multiple of the current price.
pub const RANGE_LOW_MULTIPLE: Decimal = dec!(0.5);

/// Upper bound of the grid as a multiple of the current price.
pub const RANGE_HIGH_MULTIPLE: Decimal = dec!(1.5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub price: Money,
    pub pnl: Money,
}

/// Ordered `(price, pnl)` samples, ascending in price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoffCurve(Vec<PayoffPoint>);

impl PayoffCurve {
    /// Evaluate `pnl` at every grid price for the given current price.
    pub fn sample<F>(current_price: Money, pnl: F) -> PayoffResult<Self>
    where
        F: Fn(Money) -> PayoffResult<Money>,
    {
        let points = price_grid(current_price)?
            .into_iter()
            .map(|price| Ok(PayoffPoint { price, pnl: pnl(price)? }))
            .collect::<PayoffResult<Vec<_>>>()?;
        Ok(PayoffCurve(points))
    }

    pub fn points(&self) -> &[PayoffPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&PayoffPoint> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&PayoffPoint> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PayoffPoint> {
        self.0.iter()
    }

    /// Slope of each segment between consecutive samples.
    ///
    /// Segments of zero width (degenerate grids) report a zero slope.
    pub fn slopes(&self) -> PayoffResult<Vec<Decimal>> {
        self.0
            .windows(2)
            .map(|w| {
                let dp = checked_sub(w[1].price, w[0].price, "price")?;
                if dp.is_zero() {
                    return Ok(Decimal::ZERO);
                }
                let dpnl = checked_sub(w[1].pnl, w[0].pnl, "pnl")?;
                dpnl.checked_div(dp).ok_or_else(|| overflow("slope"))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a PayoffCurve {
    type Item = &'a PayoffPoint;
    type IntoIter = std::slice::Iter<'a, PayoffPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Lower and upper grid bounds for a current price.
pub fn price_range(current_price: Money) -> PayoffResult<(Money, Money)> {
    Ok((
        checked_mul(current_price, RANGE_LOW_MULTIPLE, "current_price")?,
        checked_mul(current_price, RANGE_HIGH_MULTIPLE, "current_price")?,
    ))
}

/// Evenly spaced prices over `price_range`, endpoints included.
///
/// Each point is `low + (high - low) * i / (n - 1)`; multiplying before
/// dividing keeps both endpoints exact.
pub fn price_grid(current_price: Money) -> PayoffResult<Vec<Money>> {
    let (low, high) = price_range(current_price)?;
    let width = checked_sub(high, low, "current_price")?;
    let intervals = Decimal::from(CURVE_POINTS as u32 - 1);
    (0..CURVE_POINTS)
        .map(|i| {
            let offset = checked_mul(width, Decimal::from(i as u32), "current_price")? / intervals;
            checked_add(low, offset, "current_price")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

fn overflow(field: &str) -> PayoffError {
    PayoffError::invalid(field, "Value out of range: arithmetic overflow")
}

/// `a * b`, reporting overflow against `field`.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, field: &str) -> PayoffResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

/// `a - b`, reporting overflow against `field`.
pub(crate) fn checked_sub(a: Decimal, b: Decimal, field: &str) -> PayoffResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(field))
}

/// `a + b`, reporting overflow against `field`.
pub(crate) fn checked_add(a: Decimal, b: Decimal, field: &str) -> PayoffResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

/// Reject non-physical current prices before building a grid.
pub fn validate_current_price(current_price: Money) -> PayoffResult<()> {
    if current_price <= Decimal::ZERO {
        return Err(PayoffError::invalid(
            "current_price",
            "Current price must be positive",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
