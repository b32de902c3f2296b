//! Hardware Abstraction Layer for RustIrAttenuator.
//!
//! Thin wrappers around peripherals.
//! Business logic stays in core modules, HAL is just I/O.

pub mod gpio;

#[cfg(target_os = "espidf")]
pub mod ir;

pub use gpio::{PinPot, PotPins};

#[cfg(target_os = "espidf")]
pub use ir::RmtIrReceiver;
