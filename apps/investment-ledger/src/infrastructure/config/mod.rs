//! Configuration and wiring.

mod container;
mod settings;

pub use container::{Container, InMemoryContainer};
pub use settings::{DemoSettings, LoggingSettings, Settings};
