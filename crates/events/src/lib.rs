//! # Tollgate Events
//!
//! This crate defines the structured data a pre-trade validator emits when it
//! refuses an order, and the human-readable rendering of that data.
//!
//! The decision itself lives in the `risk` crate. Keeping the payload here
//! lets a log sink, a CLI or a UI each render the same rejection its own way.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{FundsRejection, FundsShortfall};
