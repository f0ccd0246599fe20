use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PayoffError;
use crate::types::*;
use crate::PayoffResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    #[default]
    Shares,
    Dollars,
}

/// The position already held in the same symbol, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingHolding {
    pub shares: Quantity,
    pub entry_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub symbol: String,
    #[serde(default, rename = "type")]
    pub purchase_type: PurchaseType,
    /// Share count, for `PurchaseType::Shares`.
    #[serde(default)]
    pub quantity: Quantity,
    /// Cash amount, for `PurchaseType::Dollars`.
    #[serde(default)]
    pub amount: Money,
    pub current_price: Money,
    #[serde(default)]
    pub existing: Option<ExistingHolding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOutput {
    pub symbol: String,
    pub purchase_type: PurchaseType,
    pub shares: Quantity,
    pub entry_price: Money,
    pub total_shares: Quantity,
    pub average_price: Money,
    /// True when the purchase was folded into an existing holding.
    pub merged: bool,
}

fn shares_to_buy(input: &PurchaseInput) -> PayoffResult<Quantity> {
    match input.purchase_type {
        PurchaseType::Dollars => {
            if input.amount <= Decimal::ZERO {
                return Err(PayoffError::invalid(
                    "amount",
                    "Amount must be positive for dollar-based purchases",
                ));
            }
            Ok(input.amount / input.current_price)
        }
        PurchaseType::Shares => {
            if input.quantity <= Decimal::ZERO {
                return Err(PayoffError::invalid(
                    "quantity",
                    "Quantity must be positive for share-based purchases",
                ));
            }
            Ok(input.quantity)
        }
    }
}

/// Size a purchase at the current price and merge it into any existing
/// holding at a share-weighted average cost.
pub fn plan_purchase(input: &PurchaseInput) -> PayoffResult<ComputationOutput<PurchaseOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let symbol = input.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(PayoffError::invalid("symbol", "Symbol required"));
    }
    if input.current_price <= Decimal::ZERO {
        return Err(PayoffError::invalid(
            "current_price",
            "Could not determine a positive current price",
        ));
    }

    let shares = shares_to_buy(input)?;
    let entry_price = input.current_price;

    let (total_shares, average_price, merged) = match &input.existing {
        Some(existing) => {
            let total_shares = existing.shares + shares;
            if total_shares.is_zero() {
                return Err(PayoffError::DivisionByZero {
                    context: "average price of merged holding".into(),
                });
            }
            let total_cost = existing.shares * existing.entry_price + shares * entry_price;
            (total_shares, total_cost / total_shares, true)
        }
        None => (shares, entry_price, false),
    };

    let output = PurchaseOutput {
        symbol,
        purchase_type: input.purchase_type,
        shares,
        entry_price,
        total_shares,
        average_price,
        merged,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holding Purchase — Weighted Average Cost",
        &serde_json::json!({
            "purchase_type": input.purchase_type,
            "current_price": input.current_price.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn share_purchase() -> PurchaseInput {
        PurchaseInput {
            symbol: " aapl ".into(),
            purchase_type: PurchaseType::Shares,
            quantity: dec!(10),
            amount: Decimal::ZERO,
            current_price: dec!(200),
            existing: None,
        }
    }

    #[test]
    fn test_new_share_purchase() {
        let out = plan_purchase(&share_purchase()).unwrap().result;
        assert_eq!(out.symbol, "AAPL");
        assert_eq!(out.shares, dec!(10));
        assert_eq!(out.entry_price, dec!(200));
        assert_eq!(out.average_price, dec!(200));
        assert!(!out.merged);
    }

    #[test]
    fn test_dollar_purchase_fractional_shares() {
        let input = PurchaseInput {
            purchase_type: PurchaseType::Dollars,
            amount: dec!(500),
            quantity: Decimal::ZERO,
            ..share_purchase()
        };
        let out = plan_purchase(&input).unwrap().result;
        assert_eq!(out.shares, dec!(2.5));
        assert_eq!(out.purchase_type, PurchaseType::Dollars);
    }

    #[test]
    fn test_merge_into_existing_holding() {
        let input = PurchaseInput {
            existing: Some(ExistingHolding {
                shares: dec!(10),
                entry_price: dec!(100),
            }),
            ..share_purchase()
        };
        let out = plan_purchase(&input).unwrap().result;
        // (10 * 100 + 10 * 200) / 20
        assert_eq!(out.total_shares, dec!(20));
        assert_eq!(out.average_price, dec!(150));
        assert!(out.merged);
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let mut input = share_purchase();
        input.quantity = Decimal::ZERO;
        assert!(plan_purchase(&input).is_err());

        input.purchase_type = PurchaseType::Dollars;
        input.amount = dec!(-5);
        assert!(plan_purchase(&input).is_err());
    }

    #[test]
    fn test_rejects_missing_price_and_symbol() {
        let mut input = share_purchase();
        input.current_price = Decimal::ZERO;
        assert!(plan_purchase(&input).is_err());

        let mut input = share_purchase();
        input.symbol = "  ".into();
        match plan_purchase(&input) {
            Err(PayoffError::InvalidInput { field, .. }) => assert_eq!(field, "symbol"),
            _ => panic!("expected InvalidInput"),
        }
    }

    #[test]
    fn test_purchase_type_wire_name() {
        let input: PurchaseInput = serde_json::from_str(
            r#"{"symbol":"spy","type":"dollars","amount":"1000","current_price":"500"}"#,
        )
        .unwrap();
        assert_eq!(input.purchase_type, PurchaseType::Dollars);
        assert_eq!(plan_purchase(&input).unwrap().result.shares, dec!(2));
    }
}
