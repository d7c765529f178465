//! Application assembly: configuration and startup wiring

pub mod config;
pub mod orchestrator;

pub use config::HabuConfig;
pub use orchestrator::Orchestrator;
