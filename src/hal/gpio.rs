//! GPIO pot driver.
//!
//! [`PinPot`] implements [`PotInterface`] over any `embedded-hal` output
//! pins and delay, so the same driver runs on ESP-IDF `PinDriver`s and on
//! host fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::fault::{FaultCode, FaultState};
use crate::pot::{Channel, Direction, PotInterface};

/// Fault data word for a failed direction-line write.
pub const FAULT_DATA_DIRECTION: u32 = 2;

/// Pot lines: two increment lines and the shared direction line.
pub struct PotPins<L, R, D> {
    pub inc_left: L,
    pub inc_right: R,
    pub direction: D,
}

/// Pulse-stepped pot on three GPIO lines.
///
/// Pin errors are latched in the fault state; the pulse train is never
/// interrupted.
pub struct PinPot<'f, L, R, D, T> {
    pins: PotPins<L, R, D>,
    delay: T,
    settle_us: u32,
    fault: &'f FaultState,
}

impl<'f, L, R, D, T> PinPot<'f, L, R, D, T>
where
    L: OutputPin,
    R: OutputPin,
    D: OutputPin,
    T: DelayNs,
{
    /// Create the driver.
    ///
    /// # Arguments
    /// * `settle_us` - hold time after each edge of a pulse
    /// * `fault` - where pin errors are latched
    pub fn new(pins: PotPins<L, R, D>, delay: T, settle_us: u32, fault: &'f FaultState) -> Self {
        Self {
            pins,
            delay,
            settle_us,
            fault,
        }
    }

    /// Drive all lines to their idle (high) level.
    ///
    /// Call once before the first positioning so the first falling edge is
    /// a real one.
    pub fn init(&mut self) {
        let left = self.pins.inc_left.set_high().is_ok();
        let right = self.pins.inc_right.set_high().is_ok();
        let dir = self.pins.direction.set_high().is_ok();
        if !left {
            self.fault.set(FaultCode::PinWrite, channel_data(Channel::Left));
        }
        if !right {
            self.fault.set(FaultCode::PinWrite, channel_data(Channel::Right));
        }
        if !dir {
            self.fault.set(FaultCode::PinWrite, FAULT_DATA_DIRECTION);
        }
    }
}

impl<'f, L, R, D, T> PotInterface for PinPot<'f, L, R, D, T>
where
    L: OutputPin,
    R: OutputPin,
    D: OutputPin,
    T: DelayNs,
{
    fn set_direction(&mut self, direction: Direction) {
        let result = if direction.level() {
            self.pins.direction.set_high()
        } else {
            self.pins.direction.set_low()
        };
        if result.is_err() {
            self.fault.set(FaultCode::PinWrite, FAULT_DATA_DIRECTION);
        }
    }

    fn pulse(&mut self, channel: Channel) {
        let ok = match channel {
            Channel::Left => negative_edge(&mut self.pins.inc_left, &mut self.delay, self.settle_us),
            Channel::Right => negative_edge(&mut self.pins.inc_right, &mut self.delay, self.settle_us),
        };
        if !ok {
            self.fault.set(FaultCode::PinWrite, channel_data(channel));
        }
    }
}

fn channel_data(channel: Channel) -> u32 {
    match channel {
        Channel::Left => 0,
        Channel::Right => 1,
    }
}

/// Low, hold, high, hold. The pot latches on the falling edge.
///
/// Both holds run even if a write fails.
#[inline]
fn negative_edge<P: OutputPin, T: DelayNs>(pin: &mut P, delay: &mut T, settle_us: u32) -> bool {
    let low = pin.set_low().is_ok();
    delay.delay_us(settle_us);
    let high = pin.set_high().is_ok();
    delay.delay_us(settle_us);
    low && high
}
