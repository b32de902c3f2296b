//! Open-loop positioning of the pulse-stepped stereo pot.
//!
//! The pot has no absolute addressing and reports nothing back. Each
//! channel has an increment line that steps the wiper on a falling edge;
//! one shared direction line selects which way. The wiper is never trusted
//! between commands: every absolute move first drives both channels
//! against the floor with more pulses than the wiper has positions, then
//! counts up from there.
//!
//! ```text
//!            zero (dir = Down)           step up (dir = Up)
//! INC_L  ‾‾|_|‾|_|‾ ... ×105 ‾‾‾‾‾‾‾‾‾‾‾‾|_|‾ ... ×(100 - R[left])
//! INC_R  ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾ ×105 ... ‾‾‾‾‾‾‾‾‾‾|_|‾ ... ×(100 - R[right])
//! ```
//!
//! Pure logic over the [`PotInterface`] trait; the GPIO implementation is
//! in `hal::gpio`.

use crate::taper::{self, STEPS};

/// Pulses emitted per channel to reach the floor.
///
/// The wiper has finer mechanical resolution than the 39 logical steps,
/// so the burst must exceed both the step count and the 100 increments of
/// the full taper.
pub const POT_STEPS: u8 = 105;

/// Balance offset meaning "no correction".
pub const BALANCE_CENTER: u8 = 100;

/// Wiper travel direction, shared by both channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward the floor (more attenuation).
    Down,
    /// Toward full scale (less attenuation).
    Up,
}

impl Direction {
    /// Logic level of the direction line for this direction.
    ///
    /// Down is driven high, Up is driven low.
    #[inline]
    pub fn level(self) -> bool {
        match self {
            Direction::Down => true,
            Direction::Up => false,
        }
    }
}

/// Stereo channel, one increment line each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// One-way command channel to the pot hardware.
///
/// Implementations own the timing contract of a pulse (falling edge, hold,
/// rising edge, hold). Neither call reports anything back.
pub trait PotInterface {
    /// Set the shared direction line.
    fn set_direction(&mut self, direction: Direction);

    /// Emit one increment pulse on `channel`.
    fn pulse(&mut self, channel: Channel);

    /// Emit `count` pulses on `channel`.
    fn pulse_n(&mut self, channel: Channel, count: u8) {
        for _ in 0..count {
            self.pulse(channel);
        }
    }
}

impl<P: PotInterface + ?Sized> PotInterface for &mut P {
    fn set_direction(&mut self, direction: Direction) {
        (**self).set_direction(direction)
    }

    fn pulse(&mut self, channel: Channel) {
        (**self).pulse(channel)
    }

    fn pulse_n(&mut self, channel: Channel, count: u8) {
        (**self).pulse_n(channel, count)
    }
}

/// Right-channel index for `index` under `balance`.
///
/// `clamp(index - (balance - CENTER), 0, STEPS)`. Note the upper bound is
/// `STEPS`, one past the last table entry; [`position`] folds it onto the
/// top of the taper.
#[inline]
pub fn right_index(index: u8, balance: u8) -> u8 {
    let offset = balance as i16 - BALANCE_CENTER as i16;
    (index as i16 - offset).clamp(0, STEPS as i16) as u8
}

/// Drive both channels to the floor.
pub fn zero<P: PotInterface + ?Sized>(pot: &mut P) {
    pot.set_direction(Direction::Down);
    pot.pulse_n(Channel::Left, POT_STEPS);
    pot.pulse_n(Channel::Right, POT_STEPS);
}

/// Move both channels to the absolute position for `index`.
///
/// Zeroes first, then steps the left channel to `index` and the right
/// channel to the balance-adjusted index. `index >= STEPS` is ignored.
pub fn position<P: PotInterface + ?Sized>(pot: &mut P, index: u8, balance: u8) {
    if index as usize >= STEPS {
        return;
    }

    let right = right_index(index, balance).min(taper::MAX_INDEX);

    zero(pot);

    pot.set_direction(Direction::Up);
    pot.pulse_n(Channel::Left, taper::pulses_from_floor(index));
    pot.pulse_n(Channel::Right, taper::pulses_from_floor(right));
}
