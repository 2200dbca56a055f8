//! # Tollgate Environment Crate
//!
//! This crate provides the read-only collaborator the pre-trade gate consults:
//! instrument reference data, the transaction cost of an order, and the global
//! margin multiplier. It defines a generic `Environment` trait and a
//! `SimulatedEnvironment` backed by the loaded configuration.
//!
//! ## Architectural Principles
//!
//! - **Read-only:** Nothing here mutates after construction, so one
//!   environment can be shared behind an `Arc` by validators running on many
//!   threads.
//! - **Cost model separation:** `TransactionCostModel` only computes fees. It
//!   does not know about cash, margin or admission, which belong to the `risk`
//!   crate.
//!
//! ## Public API
//!
//! - `Environment`: The capability trait validators depend on.
//! - `SimulatedEnvironment`: The configuration-backed implementation.
//! - `TransactionCostModel`: Commission and tax estimation per account type.
//! - `EnvironmentError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cost;
pub mod error;
pub mod simulated;

// Re-export the key components to provide a clean, public-facing API.
pub use cost::TransactionCostModel;
pub use error::EnvironmentError;
pub use simulated::{Environment, SimulatedEnvironment};
