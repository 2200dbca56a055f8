use configuration::{Commission, CommissionType, FutureCommission, InstrumentConfig, StockCommission};
use crate::error::EnvironmentError;
use core_types::{Instrument, Order, OrderSide};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Per-instrument futures fee override taken from the instrument registry.
#[derive(Debug, Clone, Copy, Default)]
struct FutureFeeOverride {
    commission_type: Option<CommissionType>,
    commission_rate: Option<Decimal>,
}

/// Estimates the fees an order would incur if it executed at its frozen price.
///
/// Stock orders pay a commission on traded value, floored at
/// `min_commission`, plus stamp tax on sells. Futures pay a commission either
/// on notional value or per contract, with per-instrument overrides.
#[derive(Debug, Clone)]
pub struct TransactionCostModel {
    stock: StockCommission,
    future: FutureCommission,
    future_overrides: HashMap<String, FutureFeeOverride>,
}

impl Default for TransactionCostModel {
    fn default() -> Self {
        Self::new(Commission::default())
    }
}

impl TransactionCostModel {
    pub fn new(commission: Commission) -> Self {
        Self {
            stock: commission.stock,
            future: commission.future,
            future_overrides: HashMap::new(),
        }
    }

    /// Builds the model from the commission schedule and any per-instrument
    /// overrides in the registry. Validation keeps overrides off stock entries.
    pub fn from_config(commission: &Commission, instruments: &[InstrumentConfig]) -> Self {
        let mut model = Self::new(commission.clone());
        for instrument in instruments {
            if instrument.commission_type.is_some() || instrument.commission_rate.is_some() {
                model.future_overrides.insert(
                    instrument.instrument_id.clone(),
                    FutureFeeOverride {
                        commission_type: instrument.commission_type,
                        commission_rate: instrument.commission_rate,
                    },
                );
            }
        }
        model
    }

    pub fn stock_cost(&self, order: &Order) -> Result<Decimal, EnvironmentError> {
        let overflow = || EnvironmentError::Overflow(order.instrument_id.clone());

        let value = order.frozen_value().ok_or_else(overflow)?;
        let commission = value
            .checked_mul(self.stock.commission_rate)
            .and_then(|v| v.checked_mul(self.stock.commission_multiplier))
            .ok_or_else(overflow)?
            .max(self.stock.min_commission);

        let tax = match order.side {
            OrderSide::Sell => value
                .checked_mul(self.stock.tax_rate)
                .and_then(|v| v.checked_mul(self.stock.tax_multiplier))
                .ok_or_else(overflow)?,
            OrderSide::Buy => Decimal::ZERO,
        };

        commission.checked_add(tax).ok_or_else(overflow)
    }

    pub fn future_cost(
        &self,
        order: &Order,
        instrument: &Instrument,
    ) -> Result<Decimal, EnvironmentError> {
        let overflow = || EnvironmentError::Overflow(order.instrument_id.clone());

        let fee = self
            .future_overrides
            .get(&instrument.instrument_id)
            .copied()
            .unwrap_or_default();
        let rate = fee.commission_rate.unwrap_or(self.future.commission_rate);
        let commission_type = fee.commission_type.unwrap_or(self.future.commission_type);

        let base = match commission_type {
            CommissionType::ByMoney => order
                .frozen_value()
                .and_then(|v| v.checked_mul(instrument.contract_multiplier))
                .and_then(|v| v.checked_mul(rate)),
            CommissionType::ByVolume => order.quantity.checked_mul(rate),
        };

        base.and_then(|v| v.checked_mul(self.future.commission_multiplier))
            .ok_or_else(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::parse_config;
    use core_types::PositionEffect;
    use rust_decimal_macros::dec;

    fn order(side: OrderSide, price: Decimal, quantity: Decimal) -> Order {
        Order::new("X", side, PositionEffect::Open, price, quantity).unwrap()
    }

    #[test]
    fn stock_commission_is_floored() {
        let model = TransactionCostModel::default();
        // 10 * 100 * 0.0008 = 0.8, below the 5.0 floor.
        assert_eq!(model.stock_cost(&order(OrderSide::Buy, dec!(10), dec!(100))).unwrap(), dec!(5));
        // 100 * 1000 * 0.0008 = 80.
        assert_eq!(model.stock_cost(&order(OrderSide::Buy, dec!(100), dec!(1000))).unwrap(), dec!(80));
    }

    #[test]
    fn stock_sell_adds_stamp_tax() {
        let model = TransactionCostModel::default();
        // 80 commission + 100_000 * 0.001 tax.
        assert_eq!(model.stock_cost(&order(OrderSide::Sell, dec!(100), dec!(1000))).unwrap(), dec!(180));
    }

    #[test]
    fn future_commission_by_money_uses_contract_multiplier() {
        let model = TransactionCostModel::default();
        let instrument = Instrument::future("IF2406", dec!(300), dec!(0.12));
        // 3500 * 2 * 300 * 0.0001
        assert_eq!(
            model.future_cost(&order(OrderSide::Buy, dec!(3500), dec!(2)), &instrument).unwrap(),
            dec!(210)
        );
    }

    #[test]
    fn per_instrument_override_switches_to_by_volume() {
        let config = parse_config(
            r#"
            [commission.future]
            commission_rate = 0.0001
            commission_multiplier = 2

            [[instruments]]
            instrument_id = "RB2410"
            account_type = "FUTURE"
            contract_multiplier = 10
            margin_rate = 0.09
            commission_type = "BY_VOLUME"
            commission_rate = 3
            "#,
        )
        .unwrap();
        let model = TransactionCostModel::from_config(&config.commission, &config.instruments);
        let rebar = config.instruments[0].to_instrument();

        // 5 lots * 3 per lot * multiplier 2.
        assert_eq!(
            model.future_cost(&order(OrderSide::Sell, dec!(3600), dec!(5)), &rebar).unwrap(),
            dec!(30)
        );

        // Instruments without an override keep the default by-money schedule.
        let other = Instrument::future("HC2410", dec!(10), dec!(0.09));
        assert_eq!(
            model.future_cost(&order(OrderSide::Buy, dec!(4000), dec!(1)), &other).unwrap(),
            dec!(8)
        );
    }

    #[test]
    fn oversized_orders_report_overflow_instead_of_panicking() {
        let model = TransactionCostModel::default();
        let huge = order(OrderSide::Buy, Decimal::MAX, dec!(2));
        assert_eq!(model.stock_cost(&huge), Err(EnvironmentError::Overflow("X".to_string())));

        // The notional fits, but not once scaled by the contract multiplier.
        let instrument = Instrument::future("X", dec!(300), dec!(0.12));
        let open = order(OrderSide::Buy, dec!(1000000000000), dec!(1000000000000000));
        assert!(matches!(
            model.future_cost(&open, &instrument),
            Err(EnvironmentError::Overflow(id)) if id == "X"
        ));
    }
}
