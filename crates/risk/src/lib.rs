//! # Tollgate Risk
//!
//! Pre-trade admission checks. The centerpiece is [`FundsValidator`], which
//! decides whether an account has the cash (stock) or margin (futures) to
//! cover an order before the order is accepted.
//!
//! Validators are pure predicates over the order, the account snapshot and
//! the read-only [`environment::Environment`]. They never mutate anything; a
//! refusal is reported to an injected [`RejectionSink`] and returned as
//! `false`.

pub mod chain;
pub mod error;
pub mod funds;
pub mod sink;

pub use chain::{FrontendValidator, ValidatorChain};
pub use error::RiskError;
pub use funds::{FundsDecision, FundsValidator};
pub use sink::{RecordingSink, RejectionSink, TracingSink};
