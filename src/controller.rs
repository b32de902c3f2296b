//! Command dispatcher and control loop body.
//!
//! The [`Controller`] is the single owner of all mutable state: the
//! attenuator (volume, balance, pot), the persistent store, and the last
//! repeatable command. The firmware's main loop is
//!
//! ```ignore
//! controller.startup(now_us());
//! loop {
//!     controller.poll(now_us(), &mut receiver);
//!     drain_logs();
//!     sleep_ms(CONFIG.poll_interval_ms);
//! }
//! ```
//!
//! Everything runs to completion on the caller's thread. A command that
//! starts positioning finishes it before the next poll.

use crate::attenuator::{Attenuator, VolumeState};
use crate::command::{Command, Keymap, Repeatable};
use crate::fault::{FaultCode, FaultState};
use crate::ir::IrReceiver;
use crate::logging::LogStream;
use crate::persist::{self, ByteStore, LoadOrigin};
use crate::pot::PotInterface;
use crate::{rt_debug, rt_info, rt_warn};

/// Dispatches remote codes onto the attenuator.
pub struct Controller<'a, P: PotInterface, S: ByteStore> {
    attenuator: Attenuator<P>,
    store: S,
    keymap: Keymap,
    last_repeatable: Option<Repeatable>,
    fault: &'a FaultState,
    log: &'a LogStream,
}

impl<'a, P: PotInterface, S: ByteStore> Controller<'a, P, S> {
    /// Create a controller. Nothing is read or driven until
    /// [`Controller::startup`].
    pub fn new(pot: P, store: S, keymap: Keymap, fault: &'a FaultState, log: &'a LogStream) -> Self {
        Self {
            attenuator: Attenuator::new(pot),
            store,
            keymap,
            last_repeatable: None,
            fault,
            log,
        }
    }

    /// Restore the persisted state and bring the pot in line with it.
    ///
    /// Returns where the state came from, or `None` if the store could not
    /// be read and defaults were used.
    pub fn startup(&mut self, now_us: i64) -> Option<LoadOrigin> {
        let (state, origin) = match persist::load(&mut self.store) {
            Ok(loaded) => (loaded.state, Some(loaded.origin)),
            Err(e) => {
                self.fault.set(FaultCode::StoreRead, 0);
                rt_warn!(self.log, now_us, "store read failed: {:?}, using defaults", e);
                (VolumeState::DEFAULT, None)
            }
        };

        self.attenuator.restore(state);
        let state = self.attenuator.state();
        rt_info!(
            self.log,
            now_us,
            "startup vol={} bal={} ({:?})",
            state.index,
            state.balance,
            origin
        );
        origin
    }

    /// Handle one decoded code.
    ///
    /// Returns the command the code mapped to, or `None` for an unbound
    /// code (which is ignored and leaves the repeat memory untouched).
    pub fn handle_code(&mut self, now_us: i64, code: u32) -> Option<Command> {
        let Some(command) = self.keymap.lookup(code) else {
            rt_debug!(self.log, now_us, "ignored code {:#010x}", code);
            return None;
        };
        self.execute(now_us, command);
        Some(command)
    }

    /// Run `command`, updating the repeat memory.
    pub fn execute(&mut self, now_us: i64, command: Command) {
        match command {
            Command::Repeat => {
                let Some(last) = self.last_repeatable else {
                    rt_debug!(self.log, now_us, "repeat with nothing to replay");
                    return;
                };
                self.step(last);
            }
            Command::VolumeUp | Command::VolumeDown => {
                if let Some(step) = command.repeatable() {
                    self.last_repeatable = Some(step);
                    self.step(step);
                }
            }
            Command::Mute => {
                self.last_repeatable = None;
                self.attenuator.mute();
            }
            Command::MaxVolume => {
                self.last_repeatable = None;
                self.attenuator.maximize();
            }
            Command::Record => {
                self.last_repeatable = None;
                self.record(now_us);
            }
            Command::BalanceUp => {
                self.last_repeatable = None;
                self.attenuator.balance_up();
            }
            Command::BalanceDown => {
                self.last_repeatable = None;
                self.attenuator.balance_down();
            }
            Command::BalanceReset => {
                self.last_repeatable = None;
                self.attenuator.reset_balance();
            }
        }

        let state = self.attenuator.state();
        rt_info!(
            self.log,
            now_us,
            "{} -> vol={} bal={} right={}",
            command.name(),
            state.index,
            state.balance,
            state.right_index()
        );
    }

    /// One loop iteration: take a decoded code, handle it, re-arm.
    ///
    /// Returns `true` if a code was received (bound or not).
    pub fn poll<R: IrReceiver + ?Sized>(&mut self, now_us: i64, receiver: &mut R) -> bool {
        let Some(code) = receiver.try_decode() else {
            return false;
        };
        self.handle_code(now_us, code);
        receiver.resume();
        true
    }

    fn step(&mut self, step: Repeatable) {
        match step {
            Repeatable::VolumeUp => self.attenuator.increase_volume(),
            Repeatable::VolumeDown => self.attenuator.decrease_volume(),
        };
    }

    /// Persist the current state. Returns `true` on success.
    fn record(&mut self, now_us: i64) -> bool {
        let state = self.attenuator.state();
        match persist::save(&mut self.store, state) {
            Ok(()) => {
                rt_info!(self.log, now_us, "saved vol={} bal={}", state.index, state.balance);
                true
            }
            Err(e) => {
                self.fault.set(FaultCode::StoreWrite, 0);
                rt_warn!(self.log, now_us, "store write failed: {:?}", e);
                false
            }
        }
    }

    /// Current volume/balance state.
    #[inline]
    pub fn state(&self) -> VolumeState {
        self.attenuator.state()
    }

    /// Command a repeat frame would replay.
    #[inline]
    pub fn last_repeatable(&self) -> Option<Repeatable> {
        self.last_repeatable
    }

    /// The attenuator (state and pot).
    pub fn attenuator(&self) -> &Attenuator<P> {
        &self.attenuator
    }

    /// Mutable access to the pot, e.g. to clear a test recorder.
    pub fn pot_mut(&mut self) -> &mut P {
        self.attenuator.pot_mut()
    }
}
