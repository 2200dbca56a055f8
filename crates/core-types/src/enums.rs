use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Whether a derivative order opens a new position or reduces an existing one.
///
/// Stock orders carry `Open` for buys and `Close` for sells by convention, but
/// the stock funds rule never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionEffect {
    Open,
    Close,
    CloseToday,
}

/// The closed set of account kinds the funds gate knows how to check.
///
/// Anything else read from configuration or the command line lands in
/// `Unrecognized` rather than failing to parse, so callers always get an
/// account to hand to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Stock,
    Future,
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("BUY"),
            OrderSide::Sell => f.write_str("SELL"),
        }
    }
}

impl fmt::Display for PositionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionEffect::Open => f.write_str("OPEN"),
            PositionEffect::Close => f.write_str("CLOSE"),
            PositionEffect::CloseToday => f.write_str("CLOSE_TODAY"),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Stock => f.write_str("STOCK"),
            AccountType::Future => f.write_str("FUTURE"),
            AccountType::Unrecognized => f.write_str("UNRECOGNIZED"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err(CoreError::UnknownVariant {
                kind: "order side",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PositionEffect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(PositionEffect::Open),
            "CLOSE" => Ok(PositionEffect::Close),
            "CLOSE_TODAY" => Ok(PositionEffect::CloseToday),
            _ => Err(CoreError::UnknownVariant {
                kind: "position effect",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for AccountType {
    type Err = CoreError;

    /// Never fails: unknown names map to `AccountType::Unrecognized`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "STOCK" => AccountType::Stock,
            "FUTURE" => AccountType::Future,
            _ => AccountType::Unrecognized,
        })
    }
}
