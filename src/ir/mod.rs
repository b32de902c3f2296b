//! IR remote input.
//!
//! The control loop only sees [`IrReceiver`]: a source of decoded 32-bit
//! codes that must be re-armed after each capture. The NEC frame decoder
//! is pure logic so it runs and tests on host; the RMT capture side lives
//! in `hal::ir`.

pub mod nec;

pub use nec::{decode, decode_code, NecFrame};

/// Source of decoded remote codes.
pub trait IrReceiver {
    /// Code of the last completed capture, if any.
    ///
    /// Keeps returning the same code until [`IrReceiver::resume`] is called.
    fn try_decode(&mut self) -> Option<u32>;

    /// Discard the current capture and arm for the next one.
    fn resume(&mut self);
}

impl<R: IrReceiver + ?Sized> IrReceiver for &mut R {
    fn try_decode(&mut self) -> Option<u32> {
        (**self).try_decode()
    }

    fn resume(&mut self) {
        (**self).resume()
    }
}
