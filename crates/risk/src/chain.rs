use core_types::{Account, Order};

/// A single admission check run before an order reaches the book.
///
/// `account` is `None` when the order has not been resolved to an account yet.
pub trait FrontendValidator: Send + Sync {
    fn name(&self) -> &str;
    fn can_submit_order(&self, order: &Order, account: Option<&Account>) -> bool;
    fn can_cancel_order(&self, order: &Order, account: Option<&Account>) -> bool;
}

/// Runs validators in registration order; an order is admitted only if every
/// validator admits it.
///
/// Evaluation stops at the first refusal, so later validators never see an
/// order an earlier one turned down. Each validator reports its own reasons.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn FrontendValidator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn add_validator(&mut self, validator: Box<dyn FrontendValidator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn can_submit_order(&self, order: &Order, account: Option<&Account>) -> bool {
        for validator in &self.validators {
            if !validator.can_submit_order(order, account) {
                tracing::debug!(
                    instrument_id = %order.instrument_id,
                    validator = validator.name(),
                    "Order submission refused."
                );
                return false;
            }
        }
        true
    }

    pub fn can_cancel_order(&self, order: &Order, account: Option<&Account>) -> bool {
        for validator in &self.validators {
            if !validator.can_cancel_order(order, account) {
                tracing::debug!(
                    instrument_id = %order.instrument_id,
                    validator = validator.name(),
                    "Order cancellation refused."
                );
                return false;
            }
        }
        true
    }
}
