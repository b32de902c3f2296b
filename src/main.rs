//! RustIrAttenuator - Main entry point
//!
//! On ESP-IDF:
//! 1. Drive pot lines idle, open NVS, start RMT capture
//! 2. Restore the saved volume/balance and position the pot
//! 3. Poll the receiver every 100 ms, draining diagnostics in between
//!
//! On host the same controller runs as a simulator: remote codes (hex) or
//! button labels are read from stdin and the resulting state and pulse
//! counts are printed.

use core::fmt;

use rust_ir_attenuator::{FaultState, LOG_STREAM};

static FAULT: FaultState = FaultState::new();

/// `fmt::Write` over stdout (the console UART on ESP-IDF).
struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

fn drain_logs() {
    rust_ir_attenuator::uart_logger::drain_to(&LOG_STREAM, &mut Stdout);
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();

    if let Err(e) = firmware::run() {
        println!("boot failed: {:?}", e);
    }
}

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::delay::{Ets, FreeRtos};
    use esp_idf_svc::hal::gpio::PinDriver;
    use esp_idf_svc::hal::prelude::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;

    use rust_ir_attenuator::config::{NvsByteStore, NvsError, CONFIG};
    use rust_ir_attenuator::hal::{PinPot, PotPins, RmtIrReceiver};
    use rust_ir_attenuator::{rt_info, rt_warn, Controller, Keymap, LOG_STREAM};

    use super::{drain_logs, FAULT};

    #[derive(Debug)]
    pub enum BootError {
        Esp(EspError),
        Nvs(NvsError),
    }

    impl From<EspError> for BootError {
        fn from(e: EspError) -> Self {
            BootError::Esp(e)
        }
    }

    impl From<NvsError> for BootError {
        fn from(e: NvsError) -> Self {
            BootError::Nvs(e)
        }
    }

    // Drivers in `run` are bound to these GPIOs.
    const _: () = assert!(
        CONFIG.pins.inc_left == 9
            && CONFIG.pins.inc_right == 8
            && CONFIG.pins.direction == 10
            && CONFIG.pins.ir_input == 11,
        "CONFIG.pins does not match the GPIO drivers in firmware::run"
    );

    fn now_us() -> i64 {
        // SAFETY: esp_timer is started by the IDF before app_main
        unsafe { esp_idf_svc::sys::esp_timer_get_time() }
    }

    pub fn run() -> Result<(), BootError> {
        println!("{}", env!("VERSION_STRING"));

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        let pot_pins = PotPins {
            inc_left: PinDriver::output(pins.gpio9)?,
            inc_right: PinDriver::output(pins.gpio8)?,
            direction: PinDriver::output(pins.gpio10)?,
        };
        let mut pot = PinPot::new(pot_pins, Ets, CONFIG.pulse_settle_us, &FAULT);
        pot.init();

        let store = NvsByteStore::open(EspDefaultNvsPartition::take()?)?;

        let mut receiver = RmtIrReceiver::new(
            peripherals.rmt.channel4,
            pins.gpio11,
            CONFIG.ir_idle_threshold_us,
        )?;

        let mut controller = Controller::new(pot, store, Keymap::DEFAULT, &FAULT, &LOG_STREAM);
        rt_info!(
            LOG_STREAM,
            now_us(),
            "pins ir={} inc_l={} inc_r={} ud={}",
            CONFIG.pins.ir_input,
            CONFIG.pins.inc_left,
            CONFIG.pins.inc_right,
            CONFIG.pins.direction
        );
        controller.startup(now_us());

        loop {
            controller.poll(now_us(), &mut receiver);

            if let Some(fault) = FAULT.take() {
                rt_warn!(
                    LOG_STREAM,
                    now_us(),
                    "fault {} data={} total={}",
                    fault.code.as_str(),
                    fault.data,
                    fault.count
                );
            }
            drain_logs();

            FreeRtos::delay_ms(CONFIG.poll_interval_ms);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::BufRead;
    use std::time::Instant;

    use rust_ir_attenuator::pot::{Channel, Direction, PotInterface};
    use rust_ir_attenuator::{Controller, Keymap, MemoryStore, LOG_STREAM};

    use super::{drain_logs, FAULT};

    /// Counts pulses per channel and direction instead of driving pins.
    #[derive(Default)]
    struct CountingPot {
        direction: Option<Direction>,
        down: [u32; 2],
        up: [u32; 2],
    }

    impl CountingPot {
        fn take(&mut self) -> ([u32; 2], [u32; 2]) {
            let counts = (self.down, self.up);
            self.down = [0; 2];
            self.up = [0; 2];
            counts
        }
    }

    impl PotInterface for CountingPot {
        fn set_direction(&mut self, direction: Direction) {
            self.direction = Some(direction);
        }

        fn pulse(&mut self, channel: Channel) {
            let slot = match channel {
                Channel::Left => 0,
                Channel::Right => 1,
            };
            match self.direction {
                Some(Direction::Up) => self.up[slot] += 1,
                // The pins idle with the direction line high (Down)
                Some(Direction::Down) | None => self.down[slot] += 1,
            }
        }
    }

    fn parse(keymap: &Keymap, token: &str) -> Option<u32> {
        if let Some(b) = keymap.bindings().iter().find(|b| b.label.eq_ignore_ascii_case(token)) {
            return Some(b.code);
        }
        let hex = token.trim_start_matches("0x").trim_start_matches("0X");
        u32::from_str_radix(hex, 16).ok()
    }

    pub fn run() {
        println!("{} (host simulator)", env!("VERSION_STRING"));
        println!("enter a code (hex) or a button label per line:");
        let keymap = Keymap::DEFAULT;
        for b in keymap.bindings() {
            println!("  {:<7} {:#010x}  {:?}", b.label, b.code, b.command);
        }

        let start = Instant::now();
        let now_us = || start.elapsed().as_micros() as i64;

        let mut controller = Controller::new(
            CountingPot::default(),
            MemoryStore::<16>::new(),
            keymap,
            &FAULT,
            &LOG_STREAM,
        );
        controller.startup(now_us());
        drain_logs();

        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            let Some(code) = parse(&keymap, token) else {
                println!("not a code: {}", token);
                continue;
            };

            controller.pot_mut().take();
            controller.handle_code(now_us(), code);
            let (down, up) = controller.pot_mut().take();
            let state = controller.state();
            println!(
                "vol={:2} bal={:3} right={:2} | down L{} R{} | up L{} R{}",
                state.index,
                state.balance,
                state.right_index(),
                down[0],
                down[1],
                up[0],
                up[1]
            );
            drain_logs();
        }
    }
}
