use environment::EnvironmentError;
use thiserror::Error;

/// Failures raised while evaluating a funds rule.
///
/// These never escape `can_submit_order`; the validator turns them into a
/// refusal so an order that cannot be priced is never admitted.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Funds required for {0} do not fit in a decimal")]
    Overflow(String),
}
