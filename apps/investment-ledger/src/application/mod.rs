//! Application layer.
//!
//! Use cases orchestrate the domain through driven ports. No business rules
//! live here; the layer loads aggregates, delegates, persists and publishes.

pub mod ports;
pub mod use_cases;

pub use use_cases::ApplicationError;
