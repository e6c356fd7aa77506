//! Basic Subscription Core - pricing, aggregation and recurrence rules.
//!
//! This crate contains the business logic of recurring subscriptions:
//! line pricing, subscription totals, monthly revenue normalization and
//! reference code allocation. It is platform-agnostic and reaches products,
//! pricelists, taxes and sequences through traits implemented by the host.

pub mod catalog;
pub mod constants;
pub mod context;
pub mod currency;
pub mod errors;
pub mod events;
pub mod pricing;
pub mod settings;
pub mod stages;
pub mod subscriptions;
pub mod tags;
pub mod taxes;
pub mod utils;

// Re-export the subscription aggregate and its service
pub use subscriptions::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
