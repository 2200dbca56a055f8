use crate::chain::FrontendValidator;
use crate::error::RiskError;
use crate::sink::{RejectionSink, TracingSink};
use core_types::{Account, AccountType, Order, OrderSide, PositionEffect};
use environment::Environment;
use events::{FundsRejection, FundsShortfall};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Outcome of a funds check, independent of how it is reported.
#[derive(Debug, Clone, PartialEq)]
pub enum FundsDecision {
    Approved,
    Rejected(FundsRejection),
}

impl FundsDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, FundsDecision::Approved)
    }

    pub fn rejection(&self) -> Option<&FundsRejection> {
        match self {
            FundsDecision::Approved => None,
            FundsDecision::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Checks that an account can cover the cash or margin an order reserves.
///
/// - **Stock** accounts: a buy needs `frozen_price * quantity` plus fees in
///   cash. Sells are always admitted.
/// - **Future** accounts: an opening order needs
///   `frozen_price * quantity * contract_multiplier * margin_rate`, scaled by
///   the margin multiplier, plus fees. Closing orders are always admitted.
/// - **Unrecognized** account types are admitted without a check.
///
/// The bound is inclusive: an order costing exactly the available cash passes.
/// Comparisons use full decimal precision. An order whose requirement does not
/// fit in a `Decimal` is refused.
pub struct FundsValidator {
    env: Arc<dyn Environment>,
    sink: Arc<dyn RejectionSink>,
}

impl FundsValidator {
    /// Creates a validator that reports refusals through `tracing`.
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self::with_sink(env, Arc::new(TracingSink))
    }

    pub fn with_sink(env: Arc<dyn Environment>, sink: Arc<dyn RejectionSink>) -> Self {
        Self { env, sink }
    }

    /// Decides whether `order` may be submitted against `account` without
    /// reporting anything.
    ///
    /// An absent account cannot be checked and is approved.
    pub fn evaluate(&self, order: &Order, account: Option<&Account>) -> FundsDecision {
        let Some(account) = account else {
            return FundsDecision::Approved;
        };

        let outcome = match account.account_type {
            AccountType::Stock => self.check_stock(order, account),
            AccountType::Future => self.check_future(order, account),
            AccountType::Unrecognized => {
                // Unknown account kinds pass unchecked. See DESIGN.md.
                tracing::debug!(
                    instrument_id = %order.instrument_id,
                    "No funds rule for account type; admitting."
                );
                Ok(FundsDecision::Approved)
            }
        };

        outcome.unwrap_or_else(|err| {
            FundsDecision::Rejected(FundsRejection::EnvironmentUnavailable {
                instrument_id: order.instrument_id.clone(),
                reason: err.to_string(),
            })
        })
    }

    /// Returns `true` if the account can cover `order`. Refusals are reported
    /// to the sink; nothing is raised.
    pub fn can_submit_order(&self, order: &Order, account: Option<&Account>) -> bool {
        let decision = self.evaluate(order, account);
        if let Some(rejection) = decision.rejection() {
            self.sink.reject(rejection);
        }
        decision.is_approved()
    }

    /// Cancelling never needs funds.
    pub fn can_cancel_order(&self, _order: &Order, _account: Option<&Account>) -> bool {
        true
    }

    fn check_stock(&self, order: &Order, account: &Account) -> Result<FundsDecision, RiskError> {
        if order.side == OrderSide::Sell {
            return Ok(FundsDecision::Approved);
        }

        let transaction_cost = self
            .env
            .get_order_transaction_cost(AccountType::Stock, order)?;
        let required = order
            .frozen_value()
            .and_then(|value| value.checked_add(transaction_cost))
            .ok_or_else(|| RiskError::Overflow(order.instrument_id.clone()))?;

        Ok(Self::covered_by_cash(order, account, required))
    }

    fn check_future(&self, order: &Order, account: &Account) -> Result<FundsDecision, RiskError> {
        if order.position_effect != PositionEffect::Open {
            return Ok(FundsDecision::Approved);
        }

        let instrument = self.env.get_instrument(&order.instrument_id)?;
        let overflow = || RiskError::Overflow(order.instrument_id.clone());
        let margin = order
            .frozen_value()
            .and_then(|value| value.checked_mul(instrument.contract_multiplier))
            .and_then(|value| value.checked_mul(instrument.margin_rate))
            .ok_or_else(overflow)?;
        let transaction_cost = self
            .env
            .get_order_transaction_cost(AccountType::Future, order)?;
        let required = margin
            .checked_mul(self.env.margin_multiplier())
            .and_then(|buffered| buffered.checked_add(transaction_cost))
            .ok_or_else(overflow)?;

        Ok(Self::covered_by_cash(order, account, required))
    }

    fn covered_by_cash(order: &Order, account: &Account, required: Decimal) -> FundsDecision {
        if required <= account.cash {
            return FundsDecision::Approved;
        }

        FundsDecision::Rejected(FundsRejection::Shortfall(FundsShortfall {
            instrument_id: order.instrument_id.clone(),
            account_type: account.account_type,
            required,
            available: account.cash,
        }))
    }
}

impl FrontendValidator for FundsValidator {
    fn name(&self) -> &str {
        "funds"
    }

    fn can_submit_order(&self, order: &Order, account: Option<&Account>) -> bool {
        FundsValidator::can_submit_order(self, order, account)
    }

    fn can_cancel_order(&self, order: &Order, account: Option<&Account>) -> bool {
        FundsValidator::can_cancel_order(self, order, account)
    }
}
