use crate::enums::{AccountType, OrderSide, PositionEffect};
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order awaiting admission by the pre-trade gate.
///
/// `frozen_price` is the price at which cash or margin is reserved for the
/// order before it executes. The gate only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub instrument_id: String,
    pub side: OrderSide,
    pub position_effect: PositionEffect,
    pub frozen_price: Decimal,
    pub quantity: Decimal,
}

impl Order {
    /// Builds an order, rejecting non-positive quantities and negative prices.
    pub fn new(
        instrument_id: impl Into<String>,
        side: OrderSide,
        position_effect: PositionEffect,
        frozen_price: Decimal,
        quantity: Decimal,
    ) -> Result<Self, CoreError> {
        if quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("must be positive, got {}", quantity),
            ));
        }
        if frozen_price.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "frozen_price".to_string(),
                format!("must not be negative, got {}", frozen_price),
            ));
        }
        Ok(Self {
            instrument_id: instrument_id.into(),
            side,
            position_effect,
            frozen_price,
            quantity,
        })
    }

    /// Value of the order at its frozen price, before multipliers or fees.
    ///
    /// `None` if the product does not fit in a `Decimal`.
    pub fn frozen_value(&self) -> Option<Decimal> {
        self.frozen_price.checked_mul(self.quantity)
    }
}

/// A read-only snapshot of the account an order would be charged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_type: AccountType,
    /// Currently available balance.
    pub cash: Decimal,
}

impl Account {
    pub fn new(account_type: AccountType, cash: Decimal) -> Self {
        Self { account_type, cash }
    }
}

/// Contract reference data. Stocks trade with a multiplier and margin rate of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument_id: String,
    pub account_type: AccountType,
    pub contract_multiplier: Decimal,
    /// Fraction of notional value required as margin.
    pub margin_rate: Decimal,
}

impl Instrument {
    pub fn stock(instrument_id: impl Into<String>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            account_type: AccountType::Stock,
            contract_multiplier: Decimal::ONE,
            margin_rate: Decimal::ONE,
        }
    }

    pub fn future(
        instrument_id: impl Into<String>,
        contract_multiplier: Decimal,
        margin_rate: Decimal,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            account_type: AccountType::Future,
            contract_multiplier,
            margin_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_rejects_zero_quantity() {
        let err = Order::new("000001.XSHE", OrderSide::Buy, PositionEffect::Open, dec!(10), dec!(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "quantity"));
    }

    #[test]
    fn order_rejects_negative_price() {
        assert!(
            Order::new("IF88", OrderSide::Sell, PositionEffect::Close, dec!(-1), dec!(1)).is_err()
        );
    }

    #[test]
    fn frozen_value_is_price_times_quantity() {
        let order =
            Order::new("000001.XSHE", OrderSide::Buy, PositionEffect::Open, dec!(10.5), dec!(200))
                .unwrap();
        assert_eq!(order.frozen_value(), Some(dec!(2100)));
    }

    #[test]
    fn frozen_value_reports_overflow() {
        let order =
            Order::new("000001.XSHE", OrderSide::Buy, PositionEffect::Open, Decimal::MAX, dec!(2))
                .unwrap();
        assert_eq!(order.frozen_value(), None);
    }

    #[test]
    fn order_serializes_with_upper_case_enums() {
        let order =
            Order::new("RB2405", OrderSide::Buy, PositionEffect::CloseToday, dec!(3600), dec!(2))
                .unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["position_effect"], "CLOSE_TODAY");
    }
}
