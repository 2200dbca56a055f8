use core_types::{AccountType, Instrument};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub base: Base,
    #[serde(default)]
    pub commission: Commission,
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
}

/// Global settings shared by every validator.
#[derive(Debug, Clone, Deserialize)]
pub struct Base {
    /// Risk buffer applied on top of exchange margin. 1.2 reserves 20% more
    /// margin than the exchange requires.
    #[serde(default = "default_margin_multiplier")]
    pub margin_multiplier: Decimal,
}

/// Fee parameters for the default transaction cost model, per account type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commission {
    #[serde(default)]
    pub stock: StockCommission,
    #[serde(default)]
    pub future: FutureCommission,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockCommission {
    /// Fraction of traded value charged as commission. 0.0008 is 0.08%.
    pub commission_rate: Decimal,
    pub commission_multiplier: Decimal,
    /// Floor applied to every order's commission.
    pub min_commission: Decimal,
    /// Stamp tax charged on sells only.
    pub tax_rate: Decimal,
    pub tax_multiplier: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FutureCommission {
    /// Default rate for instruments that do not set their own.
    pub commission_rate: Decimal,
    pub commission_multiplier: Decimal,
    #[serde(default)]
    pub commission_type: CommissionType,
}

/// How a futures commission rate is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionType {
    /// Rate is a fraction of notional value.
    #[default]
    ByMoney,
    /// Rate is a flat fee per contract.
    ByVolume,
}

/// One entry of the instrument registry.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    pub instrument_id: String,
    pub account_type: AccountType,
    #[serde(default = "one")]
    pub contract_multiplier: Decimal,
    #[serde(default = "one")]
    pub margin_rate: Decimal,
    /// Overrides `commission.future.commission_type` for this instrument.
    pub commission_type: Option<CommissionType>,
    /// Overrides `commission.future.commission_rate` for this instrument.
    pub commission_rate: Option<Decimal>,
}

impl InstrumentConfig {
    pub fn to_instrument(&self) -> Instrument {
        Instrument {
            instrument_id: self.instrument_id.clone(),
            account_type: self.account_type,
            contract_multiplier: self.contract_multiplier,
            margin_rate: self.margin_rate,
        }
    }
}

fn default_margin_multiplier() -> Decimal {
    Decimal::ONE
}

fn one() -> Decimal {
    Decimal::ONE
}

// --- Default Implementations ---
// Mirrors the usual A-share and domestic futures fee schedule so a config
// file only needs a `[base]` section.

impl Default for Base {
    fn default() -> Self {
        Self {
            margin_multiplier: default_margin_multiplier(),
        }
    }
}

impl Default for StockCommission {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.0008),
            commission_multiplier: dec!(1),
            min_commission: dec!(5),
            tax_rate: dec!(0.001),
            tax_multiplier: dec!(1),
        }
    }
}

impl Default for FutureCommission {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.0001),
            commission_multiplier: dec!(1),
            commission_type: CommissionType::ByMoney,
        }
    }
}

impl Config {
    /// Checks the values a deserializer cannot: multipliers, rates and ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.margin_multiplier < Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "base.margin_multiplier must be at least 1, got {}",
                self.base.margin_multiplier
            )));
        }

        let stock = &self.commission.stock;
        let future = &self.commission.future;
        let rates = [
            ("commission.stock.commission_rate", stock.commission_rate),
            ("commission.stock.commission_multiplier", stock.commission_multiplier),
            ("commission.stock.min_commission", stock.min_commission),
            ("commission.stock.tax_rate", stock.tax_rate),
            ("commission.stock.tax_multiplier", stock.tax_multiplier),
            ("commission.future.commission_rate", future.commission_rate),
            ("commission.future.commission_multiplier", future.commission_multiplier),
        ];
        for (name, value) in rates {
            if value.is_sign_negative() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for instrument in &self.instruments {
            if !seen.insert(instrument.instrument_id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {} is listed more than once",
                    instrument.instrument_id
                )));
            }
            if instrument.contract_multiplier <= Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {}: contract_multiplier must be positive",
                    instrument.instrument_id
                )));
            }
            if instrument.account_type == AccountType::Stock
                && (instrument.commission_type.is_some() || instrument.commission_rate.is_some())
            {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {}: fee overrides only apply to FUTURE instruments",
                    instrument.instrument_id
                )));
            }
            if instrument.margin_rate.is_sign_negative()
                || instrument.commission_rate.is_some_and(|r| r.is_sign_negative())
            {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {}: rates must not be negative",
                    instrument.instrument_id
                )));
            }
        }

        Ok(())
    }
}
