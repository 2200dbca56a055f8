use crate::error::EventsError;
use core_types::AccountType;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The account could not cover the cash or margin an order needs.
///
/// Amounts keep full precision; only `Display` rounds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsShortfall {
    pub instrument_id: String,
    pub account_type: AccountType,
    /// Cash or margin the order would reserve, fees included.
    pub required: Decimal,
    /// Cash the account had available at the time of the check.
    pub available: Decimal,
}

impl FundsShortfall {
    /// How much cash is missing. Always positive for a real shortfall.
    ///
    /// Saturates at the `Decimal` bounds.
    pub fn deficit(&self) -> Decimal {
        self.required.saturating_sub(self.available)
    }
}

/// Why a funds check refused an order.
///
/// The `#[serde(tag = "kind")]` attribute flattens the variant name into the
/// payload, so a shortfall serializes as
/// `{ "kind": "Shortfall", "instrument_id": "...", "required": "...", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FundsRejection {
    /// Not enough cash or margin.
    Shortfall(FundsShortfall),
    /// Instrument data or the cost model was unavailable, so the order could
    /// not be priced.
    EnvironmentUnavailable {
        instrument_id: String,
        reason: String,
    },
}

impl FundsRejection {
    pub fn instrument_id(&self) -> &str {
        match self {
            FundsRejection::Shortfall(shortfall) => &shortfall.instrument_id,
            FundsRejection::EnvironmentUnavailable { instrument_id, .. } => instrument_id,
        }
    }

    pub fn to_json(&self) -> Result<String, EventsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Rounds half away from zero to two places for display.
fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for FundsShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order Creation Failed: not enough money to buy {}, needs {:.2}, cash {:.2}",
            self.instrument_id,
            cents(self.required),
            cents(self.available)
        )
    }
}

impl fmt::Display for FundsRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundsRejection::Shortfall(shortfall) => fmt::Display::fmt(shortfall, f),
            FundsRejection::EnvironmentUnavailable {
                instrument_id,
                reason,
            } => write!(
                f,
                "Order Creation Failed: cannot price {}: {}",
                instrument_id, reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn shortfall(required: Decimal, available: Decimal) -> FundsShortfall {
        FundsShortfall {
            instrument_id: "000001.XSHE".to_string(),
            account_type: AccountType::Stock,
            required,
            available,
        }
    }

    #[test]
    fn renders_amounts_to_two_places() {
        let message = shortfall(dec!(1005), dec!(1004.99)).to_string();
        assert_eq!(
            message,
            "Order Creation Failed: not enough money to buy 000001.XSHE, needs 1005.00, cash 1004.99"
        );
    }

    #[test]
    fn rounding_is_presentation_only() {
        let s = shortfall(dec!(100.005), dec!(100.004));
        assert!(s.to_string().ends_with("needs 100.01, cash 100.00"));
        assert_eq!(s.deficit(), dec!(0.001));
    }

    #[test]
    fn deficit_saturates_instead_of_overflowing() {
        assert_eq!(shortfall(Decimal::MAX, Decimal::MIN).deficit(), Decimal::MAX);
    }

    #[test]
    fn environment_failure_names_the_instrument() {
        let rejection = FundsRejection::EnvironmentUnavailable {
            instrument_id: "IF2406".to_string(),
            reason: "instrument not found".to_string(),
        };
        assert_eq!(rejection.instrument_id(), "IF2406");
        assert_eq!(
            rejection.to_string(),
            "Order Creation Failed: cannot price IF2406: instrument not found"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let rejection = FundsRejection::Shortfall(shortfall(dec!(10), dec!(5)));
        let json: serde_json::Value = serde_json::from_str(&rejection.to_json().unwrap()).unwrap();
        assert_eq!(json["kind"], "Shortfall");
        assert_eq!(json["instrument_id"], "000001.XSHE");
        assert_eq!(json["account_type"], "STOCK");
    }
}
