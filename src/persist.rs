//! Persistence of the volume state in a byte-addressed store.
//!
//! Two bytes, fixed offsets, EEPROM semantics: an erased or never-written
//! byte reads as [`SENTINEL`]. Defaults are applied here and nowhere else.
//!
//! | Offset | Field |
//! |---|---|
//! | 0 | volume index |
//! | 1 | balance offset |

use crate::attenuator::{VolumeState, DEFAULT_VOLUME, MAX_BALANCE};
use crate::pot::BALANCE_CENTER;
use crate::taper::STEPS;

/// Store offset of the volume index.
pub const VOLUME_OFFSET: u16 = 0;

/// Store offset of the balance offset.
pub const BALANCE_OFFSET: u16 = 1;

/// Value of a byte that has never been written.
pub const SENTINEL: u8 = 0xFF;

/// Byte-addressed persistent store.
pub trait ByteStore {
    /// Error reported by the underlying storage.
    type Error: core::fmt::Debug;

    /// Read the byte at `offset`. Never-written bytes read as [`SENTINEL`].
    fn read_byte(&mut self, offset: u16) -> Result<u8, Self::Error>;

    /// Write `value` at `offset`.
    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), Self::Error>;
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    type Error = S::Error;

    fn read_byte(&mut self, offset: u16) -> Result<u8, Self::Error> {
        (**self).read_byte(offset)
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), Self::Error> {
        (**self).write_byte(offset, value)
    }
}

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Neither field was stored, both are defaults
    FreshInstall,
    /// One field was stored, the other defaulted
    Partial,
    /// Both fields were read from the store
    Restored,
}

/// Result of a successful [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loaded {
    pub state: VolumeState,
    pub origin: LoadOrigin,
}

/// Read the persisted state, applying defaults for unset fields.
///
/// A volume byte outside `0..STEPS` cannot have been written by [`save`]
/// and is treated like the sentinel. The returned state always satisfies
/// the state model's invariants.
pub fn load<S: ByteStore + ?Sized>(store: &mut S) -> Result<Loaded, S::Error> {
    let raw_index = store.read_byte(VOLUME_OFFSET)?;
    let raw_balance = store.read_byte(BALANCE_OFFSET)?;

    let index_set = (raw_index as usize) < STEPS;
    let balance_set = raw_balance != SENTINEL;

    let state = VolumeState {
        index: if index_set { raw_index } else { DEFAULT_VOLUME },
        balance: if balance_set { raw_balance } else { BALANCE_CENTER },
    };

    let origin = match (index_set, balance_set) {
        (true, true) => LoadOrigin::Restored,
        (false, false) => LoadOrigin::FreshInstall,
        _ => LoadOrigin::Partial,
    };

    Ok(Loaded { state, origin })
}

/// Write both fields of `state`.
///
/// Stops at the first failed byte. Values are clamped so neither field can
/// be stored as the sentinel.
pub fn save<S: ByteStore + ?Sized>(store: &mut S, state: VolumeState) -> Result<(), S::Error> {
    store.write_byte(VOLUME_OFFSET, state.index.min((STEPS - 1) as u8))?;
    store.write_byte(BALANCE_OFFSET, state.balance.min(MAX_BALANCE))?;
    Ok(())
}

/// RAM-backed store, erased to [`SENTINEL`].
///
/// Used by the host simulator and as the fallback when no persistent
/// backend is available.
#[derive(Debug, Clone)]
pub struct MemoryStore<const N: usize = 16> {
    bytes: [u8; N],
}

/// Access outside a [`MemoryStore`]'s capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds(pub u16);

impl<const N: usize> MemoryStore<N> {
    /// Create an erased store.
    pub const fn new() -> Self {
        Self { bytes: [SENTINEL; N] }
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Erase every byte back to the sentinel.
    pub fn erase(&mut self) {
        self.bytes = [SENTINEL; N];
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteStore for MemoryStore<N> {
    type Error = OutOfBounds;

    fn read_byte(&mut self, offset: u16) -> Result<u8, Self::Error> {
        self.bytes.get(offset as usize).copied().ok_or(OutOfBounds(offset))
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), Self::Error> {
        let slot = self.bytes.get_mut(offset as usize).ok_or(OutOfBounds(offset))?;
        *slot = value;
        Ok(())
    }
}
