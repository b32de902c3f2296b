//! Module: config
//!
//! Purpose: Board and timing configuration for RustIrAttenuator.
//!
//! Architecture:
//! - `AttenuatorConfig::DEFAULT`: compile-time board description
//! - ESP32-S3 board wiring; the firmware asserts at compile time that its
//!   GPIO drivers match `CONFIG.pins`
//! - `nvs`: persistent byte store backed by ESP-IDF NVS
//!
//! The engine constants (taper length, floor burst, balance centre) live
//! next to the code that depends on them; this module only holds what
//! changes between boards.

pub mod nvs;

pub use nvs::{NvsByteStore, NvsError, NVS_NAMESPACE};

/// GPIO assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMap {
    /// IR receiver module output
    pub ir_input: u8,
    /// Left channel increment line
    pub inc_left: u8,
    /// Right channel increment line
    pub inc_right: u8,
    /// Shared up/down line
    pub direction: u8,
}

/// Complete board configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttenuatorConfig {
    pub pins: PinMap,
    /// Hold time after each edge of an increment pulse (µs).
    ///
    /// Must cover the pot's minimum INC low/high width.
    pub pulse_settle_us: u32,
    /// Delay between receiver polls (ms)
    pub poll_interval_ms: u32,
    /// RMT idle threshold: a space longer than this ends a capture (µs)
    pub ir_idle_threshold_us: u16,
}

impl AttenuatorConfig {
    pub const DEFAULT: Self = Self {
        pins: PinMap {
            ir_input: 11,
            inc_left: 9,
            inc_right: 8,
            direction: 10,
        },
        pulse_settle_us: 3,
        poll_interval_ms: 100,
        ir_idle_threshold_us: 12_000,
    };
}

impl Default for AttenuatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Active board configuration.
pub const CONFIG: AttenuatorConfig = AttenuatorConfig::DEFAULT;
