//! Domain services for the investment context.

pub mod conversion;
