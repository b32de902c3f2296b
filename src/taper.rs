//! Logarithmic resistance taper
//!
//! 39-entry table mapping a volume index to the pot resistance, in percent
//! of full scale. Index 0 = silence (100%), index 38 = maximum (0%).
//! The first 21 steps are linear 1% steps, the rest follow the
//! perceptual curve.

/// Number of addressable volume steps
pub const STEPS: usize = 39;

/// Highest valid volume index
pub const MAX_INDEX: u8 = (STEPS - 1) as u8;

/// Full-scale resistance, in percent
pub const FULL_SCALE: u8 = 100;

/// Resistance per volume index, in percent of full scale
///
/// Monotonically non-increasing from 100 to 0.
pub static RESISTANCE_TAPER: [u8; STEPS] = [
    100, 99, 98, 97, 96, 95, 94, 93, 92, 91,
    90, 89, 88, 87, 86, 85, 84, 83, 82, 81,
    80, 77, 75, 72, 69, 66, 63, 59, 56, 52,
    47, 43, 38, 32, 27, 21, 15, 9, 0,
];

/// Resistance for `index`.
///
/// Callers must keep `index < STEPS`; the table does not clamp.
#[inline]
pub fn resistance(index: u8) -> u8 {
    RESISTANCE_TAPER[index as usize]
}

/// Increment pulses needed from the floor to reach `index`.
#[inline]
pub fn pulses_from_floor(index: u8) -> u8 {
    FULL_SCALE - resistance(index)
}
