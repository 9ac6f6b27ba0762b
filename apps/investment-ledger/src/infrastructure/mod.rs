//! Infrastructure layer: adapters behind the application ports.

pub mod config;
pub mod journal;
pub mod persistence;
pub mod registry;
