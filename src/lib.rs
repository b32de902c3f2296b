//! # RustIrAttenuator
//!
//! Control core of an IR-remote-operated stereo attenuator built around a
//! pulse-stepped ("increment/decrement") digital potentiometer.
//!
//! ## Architecture
//!
//! ```text
//! IrReceiver ──▶ Controller ──▶ Attenuator ──▶ pot::position ──▶ PotInterface
//!  (code)        (keymap,        (volume,       (zero + step      (GPIO lines)
//!                 repeat)         balance)        up, taper)
//!                    │
//!                    └──▶ persist ──▶ ByteStore (NVS / EEPROM)
//! ```
//!
//! The pot is driven open-loop: every move re-zeroes against the floor and
//! counts up. All hardware sits behind traits, so the whole engine runs and
//! tests on host.

#![cfg_attr(not(test), no_std)]

pub mod attenuator;
pub mod command;
pub mod config;
pub mod controller;
pub mod fault;
pub mod hal;
pub mod ir;
pub mod logging;
pub mod persist;
pub mod pot;
pub mod taper;
pub mod uart_logger;

pub use attenuator::{Attenuator, VolumeState};
pub use command::{Command, KeyBinding, Keymap, Repeatable};
pub use config::CONFIG;
pub use controller::Controller;
pub use fault::{FaultCode, FaultState};
pub use ir::IrReceiver;
pub use logging::{LogStream, LOG_STREAM};
pub use persist::{ByteStore, MemoryStore};
pub use pot::{Channel, Direction, PotInterface};
