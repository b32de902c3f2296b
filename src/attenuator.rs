//! Volume/balance state model.
//!
//! Owns the absolute volume index and the balance offset, and is the only
//! caller of the positioning protocol. All transitions saturate; none can
//! fail.

use crate::pot::{self, PotInterface, BALANCE_CENTER};
use crate::taper::MAX_INDEX;

/// Default volume index for a never-written store (mid-scale).
pub const DEFAULT_VOLUME: u8 = 20;

/// Largest balance offset the model will hold.
///
/// 0xFF is the store's "never written" marker, so the offset stops one
/// short of it and always survives a save/load.
pub const MAX_BALANCE: u8 = 0xFE;

/// Volume index and balance offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeState {
    /// Left-channel index, `0..STEPS`.
    pub index: u8,
    /// Right-channel correction, centred at [`BALANCE_CENTER`].
    pub balance: u8,
}

impl VolumeState {
    /// State used when nothing has been stored yet.
    pub const DEFAULT: Self = Self {
        index: DEFAULT_VOLUME,
        balance: BALANCE_CENTER,
    };

    /// Right-channel index derived from this state.
    #[inline]
    pub fn right_index(&self) -> u8 {
        pot::right_index(self.index, self.balance)
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The attenuator: state plus the pot it drives.
pub struct Attenuator<P: PotInterface> {
    pot: P,
    state: VolumeState,
}

impl<P: PotInterface> Attenuator<P> {
    /// Create with the default state. The pot is not touched until
    /// [`Attenuator::sync`] or a transition runs.
    pub fn new(pot: P) -> Self {
        Self {
            pot,
            state: VolumeState::DEFAULT,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> VolumeState {
        self.state
    }

    /// Current volume index.
    #[inline]
    pub fn index(&self) -> u8 {
        self.state.index
    }

    /// Current balance offset.
    #[inline]
    pub fn balance(&self) -> u8 {
        self.state.balance
    }

    /// Borrow the pot.
    pub fn pot(&self) -> &P {
        &self.pot
    }

    /// Mutably borrow the pot.
    pub fn pot_mut(&mut self) -> &mut P {
        &mut self.pot
    }

    /// Replace the state and position the pot to match.
    ///
    /// The index is clamped into range so a caller cannot break the
    /// model's invariant.
    pub fn restore(&mut self, state: VolumeState) {
        self.state = VolumeState {
            index: state.index.min(MAX_INDEX),
            balance: state.balance.min(MAX_BALANCE),
        };
        self.sync();
    }

    /// Re-run positioning for the current state.
    pub fn sync(&mut self) {
        pot::position(&mut self.pot, self.state.index, self.state.balance);
    }

    /// One step up. Returns `true` if the index changed.
    pub fn increase_volume(&mut self) -> bool {
        if self.state.index >= MAX_INDEX {
            return false;
        }
        self.state.index += 1;
        self.sync();
        true
    }

    /// One step down. Returns `true` if the index changed.
    pub fn decrease_volume(&mut self) -> bool {
        if self.state.index == 0 {
            return false;
        }
        self.state.index -= 1;
        self.sync();
        true
    }

    /// Index 0; both channels driven to the floor only.
    pub fn mute(&mut self) {
        self.state.index = 0;
        pot::zero(&mut self.pot);
    }

    /// Index STEPS-1, positioned like any other index so the balance
    /// correction still applies to the right channel.
    pub fn maximize(&mut self) {
        self.state.index = MAX_INDEX;
        self.sync();
    }

    /// Shift the right channel one step quieter.
    pub fn balance_up(&mut self) {
        if self.state.balance < MAX_BALANCE {
            self.state.balance += 1;
        }
        self.sync();
    }

    /// Shift the right channel one step louder.
    pub fn balance_down(&mut self) {
        self.state.balance = self.state.balance.saturating_sub(1);
        self.sync();
    }

    /// Remove any balance correction.
    pub fn reset_balance(&mut self) {
        self.state.balance = BALANCE_CENTER;
        self.sync();
    }
}
