//! RMT capture for the IR receiver module.
//!
//! The RMT peripheral records the demodulated envelope as (level, ticks)
//! pairs at 1 µs per tick. A space longer than the idle threshold ends the
//! capture; the pulses are then handed to the NEC decoder.

use esp_idf_svc::hal::gpio::InputPin;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::rmt::config::ReceiveConfig;
use esp_idf_svc::hal::rmt::{Pulse, Receive, RmtChannel, RxRmtDriver};
use esp_idf_svc::sys::EspError;

use crate::ir::{nec, IrReceiver};

/// (mark, space) pairs per capture; a data frame needs 34.
const CAPTURE_PAIRS: usize = 40;

/// 80 MHz APB / 80 = 1 µs ticks
const CLOCK_DIVIDER: u8 = 80;

/// IR receiver on one RMT RX channel.
pub struct RmtIrReceiver<'d> {
    rx: RxRmtDriver<'d>,
    pulses: [(Pulse, Pulse); CAPTURE_PAIRS],
    durations: [u32; 2 * CAPTURE_PAIRS],
    pending: Option<u32>,
}

impl<'d> RmtIrReceiver<'d> {
    /// Configure the channel and start capturing.
    pub fn new<C: RmtChannel>(
        channel: impl Peripheral<P = C> + 'd,
        pin: impl Peripheral<P = impl InputPin> + 'd,
        idle_threshold_us: u16,
    ) -> Result<Self, EspError> {
        let config = ReceiveConfig::new()
            .clock_divider(CLOCK_DIVIDER)
            .idle_threshold(idle_threshold_us);
        let mut rx = RxRmtDriver::new(channel, pin, &config, 1000)?;
        rx.start()?;

        Ok(Self {
            rx,
            pulses: [(Pulse::zero(), Pulse::zero()); CAPTURE_PAIRS],
            durations: [0; 2 * CAPTURE_PAIRS],
            pending: None,
        })
    }

    /// Non-blocking read of one capture, decoded.
    fn capture(&mut self) -> Option<u32> {
        let pairs = match self.rx.receive(&mut self.pulses, 0) {
            Ok(Receive::Read(n)) => n,
            _ => return None,
        };

        let mut len = 0;
        'capture: for (first, second) in &self.pulses[..pairs.min(CAPTURE_PAIRS)] {
            for pulse in [first, second] {
                let ticks = pulse.ticks.ticks() as u32;
                // A zero-length item marks the end of the capture.
                if ticks == 0 {
                    break 'capture;
                }
                self.durations[len] = ticks;
                len += 1;
            }
        }

        nec::decode_code(&self.durations[..len])
    }
}

impl IrReceiver for RmtIrReceiver<'_> {
    fn try_decode(&mut self) -> Option<u32> {
        if self.pending.is_none() {
            self.pending = self.capture();
        }
        self.pending
    }

    fn resume(&mut self) {
        self.pending = None;
    }
}
