//! # Tollgate Core Types
//!
//! The value objects shared by every crate in the workspace: the order being
//! admitted, the account it would be charged against, and the instrument
//! reference data looked up for derivatives.
//!
//! Nothing in this crate performs I/O or holds state beyond the values
//! themselves.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AccountType, OrderSide, PositionEffect};
pub use error::CoreError;
pub use structs::{Account, Instrument, Order};
