//! `sonarbridge-node` – The Translation Node
//!
//! Converts proprietary sonar distance readings into standardized range-scan
//! messages and republishes them on the event bus.
//!
//! # Modules
//!
//! - [`adapter`] – [`ScanAdapter`][adapter::ScanAdapter]: the stateless
//!   sonar-to-scan translator and its bus-driven dispatch loop.  The pure
//!   core is [`translate`][adapter::translate].
//! - [`sim`] – [`SimSonar`][sim::SimSonar]: a simulated sonar source for
//!   headless runs and CI, publishing synthetic readings at a fixed period.

pub mod adapter;
pub mod sim;

pub use adapter::{ScanAdapter, translate};
pub use sim::SimSonar;
