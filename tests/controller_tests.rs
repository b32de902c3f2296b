//! Dispatcher and control loop tests

mod common;

use common::{expected_position, FailingStore, RecordingPot, ScriptedReceiver};
use rust_ir_attenuator::attenuator::VolumeState;
use rust_ir_attenuator::command::{Command, Keymap, Repeatable, REPEAT_CODE};
use rust_ir_attenuator::controller::Controller;
use rust_ir_attenuator::fault::{FaultCode, FaultState};
use rust_ir_attenuator::logging::LogStream;
use rust_ir_attenuator::persist::{save, ByteStore, LoadOrigin, MemoryStore};
use rust_ir_attenuator::pot::{Channel, Direction, POT_STEPS};
use rust_ir_attenuator::taper::MAX_INDEX;

const MUTE: u32 = 0x00FF_B24D;
const MAX: u32 = 0x00FF_6897;
const VOL_UP: u32 = 0x00FF_7887;
const VOL_DOWN: u32 = 0x00FF_50AF;
const REC: u32 = 0x00FF_32CD;
const BAL_UP: u32 = 0x00FF_E817;
const BAL_RESET: u32 = 0x00FF_A857;
const BAL_DOWN: u32 = 0x00FF_8877;
const UNBOUND: u32 = 0x00FF_02FD;

fn store_with(state: VolumeState) -> MemoryStore<16> {
    let mut store = MemoryStore::new();
    save(&mut store, state).unwrap();
    store
}

fn started<'a>(
    store: MemoryStore<16>,
    fault: &'a FaultState,
    log: &'a LogStream,
) -> Controller<'a, RecordingPot, MemoryStore<16>> {
    let mut c = Controller::new(RecordingPot::new(), store, Keymap::DEFAULT, fault, log);
    c.startup(0);
    c.pot_mut().clear();
    c
}

#[test]
fn test_startup_fresh_store() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = Controller::new(RecordingPot::new(), MemoryStore::<16>::new(), Keymap::DEFAULT, &fault, &log);

    assert_eq!(c.startup(0), Some(LoadOrigin::FreshInstall));
    assert_eq!(c.state(), VolumeState { index: 20, balance: 100 });
    // Initial physical sync
    assert_eq!(c.attenuator().pot().phases(), expected_position(20, 20));
}

#[test]
fn test_startup_restores_saved_state() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let store = store_with(VolumeState { index: 30, balance: 98 });
    let mut c = Controller::new(RecordingPot::new(), store, Keymap::DEFAULT, &fault, &log);

    assert_eq!(c.startup(0), Some(LoadOrigin::Restored));
    assert_eq!(c.state(), VolumeState { index: 30, balance: 98 });
    assert_eq!(c.attenuator().pot().phases(), expected_position(53, 62));
}

#[test]
fn test_startup_read_failure_uses_defaults() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = Controller::new(RecordingPot::new(), FailingStore::new(true, false), Keymap::DEFAULT, &fault, &log);

    assert_eq!(c.startup(0), None);
    assert_eq!(c.state(), VolumeState::DEFAULT);
    assert!(fault.is_active());
    assert_eq!(fault.code(), FaultCode::StoreRead);
}

#[test]
fn test_volume_up_then_repeats() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    assert_eq!(c.handle_code(0, VOL_UP), Some(Command::VolumeUp));
    assert_eq!(c.last_repeatable(), Some(Repeatable::VolumeUp));
    c.handle_code(0, REPEAT_CODE);
    c.handle_code(0, REPEAT_CODE);

    assert_eq!(c.state().index, 23);
    assert_eq!(c.last_repeatable(), Some(Repeatable::VolumeUp));
}

#[test]
fn test_repeat_capped_at_max() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(store_with(VolumeState { index: 37, balance: 100 }), &fault, &log);

    c.handle_code(0, VOL_UP);
    c.handle_code(0, REPEAT_CODE);
    c.handle_code(0, REPEAT_CODE);
    assert_eq!(c.state().index, MAX_INDEX);
}

#[test]
fn test_volume_down_repeats() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(store_with(VolumeState { index: 2, balance: 100 }), &fault, &log);

    c.handle_code(0, VOL_DOWN);
    for _ in 0..5 {
        c.handle_code(0, REPEAT_CODE);
    }
    assert_eq!(c.state().index, 0);
    assert_eq!(c.last_repeatable(), Some(Repeatable::VolumeDown));
}

#[test]
fn test_mute_clears_repeat() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    c.handle_code(0, VOL_UP);
    c.handle_code(0, MUTE);
    assert_eq!(c.state().index, 0);
    assert_eq!(c.last_repeatable(), None);

    c.pot_mut().clear();
    assert_eq!(c.handle_code(0, REPEAT_CODE), Some(Command::Repeat));
    assert_eq!(c.state().index, 0);
    assert!(c.attenuator().pot().events.is_empty(), "repeat after mute must not move the pot");
}

#[test]
fn test_non_directional_commands_clear_repeat() {
    for code in [MUTE, MAX, REC, BAL_UP, BAL_DOWN, BAL_RESET] {
        let fault = FaultState::new();
        let log: LogStream = LogStream::new();
        let mut c = started(MemoryStore::new(), &fault, &log);

        c.handle_code(0, VOL_DOWN);
        c.handle_code(0, code);
        assert_eq!(c.last_repeatable(), None, "code {:#010x}", code);

        let before = c.state();
        c.handle_code(0, REPEAT_CODE);
        assert_eq!(c.state(), before, "code {:#010x}", code);
    }
}

#[test]
fn test_unbound_code_ignored() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    c.handle_code(0, VOL_UP);
    c.pot_mut().clear();

    assert_eq!(c.handle_code(0, UNBOUND), None);
    assert!(c.attenuator().pot().events.is_empty());
    assert_eq!(c.state().index, 21);

    // Repeat memory survives an unbound code
    assert_eq!(c.last_repeatable(), Some(Repeatable::VolumeUp));
    c.handle_code(0, REPEAT_CODE);
    assert_eq!(c.state().index, 22);
}

#[test]
fn test_repeat_before_anything() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    c.handle_code(0, REPEAT_CODE);
    assert_eq!(c.state(), VolumeState::DEFAULT);
    assert!(c.attenuator().pot().events.is_empty());
}

#[test]
fn test_max_volume() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    c.handle_code(0, MAX);
    assert_eq!(c.state().index, MAX_INDEX);
    assert_eq!(c.attenuator().pot().phases(), expected_position(100, 100));
}

#[test]
fn test_balance_codes() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    c.handle_code(0, BAL_UP);
    c.handle_code(0, BAL_UP);
    assert_eq!(c.state(), VolumeState { index: 20, balance: 102 });
    assert_eq!(c.state().right_index(), 18);

    c.handle_code(0, BAL_DOWN);
    assert_eq!(c.state().balance, 101);

    c.handle_code(0, BAL_RESET);
    assert_eq!(c.state().balance, 100);
}

#[test]
fn test_record_persists_and_restores() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut store = MemoryStore::<16>::new();

    {
        let mut c = Controller::new(RecordingPot::new(), &mut store, Keymap::DEFAULT, &fault, &log);
        c.startup(0);
        c.handle_code(0, VOL_UP);
        c.handle_code(0, BAL_DOWN);
        c.handle_code(0, REC);
    }
    assert_eq!(store.read_byte(0), Ok(21));
    assert_eq!(store.read_byte(1), Ok(99));

    // Power cycle
    let mut c = Controller::new(RecordingPot::new(), &mut store, Keymap::DEFAULT, &fault, &log);
    assert_eq!(c.startup(0), Some(LoadOrigin::Restored));
    assert_eq!(c.state(), VolumeState { index: 21, balance: 99 });
    assert!(!fault.is_active());
}

#[test]
fn test_unsaved_changes_lost() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut store = MemoryStore::<16>::new();

    {
        let mut c = Controller::new(RecordingPot::new(), &mut store, Keymap::DEFAULT, &fault, &log);
        c.startup(0);
        c.handle_code(0, MAX);
    }

    let mut c = Controller::new(RecordingPot::new(), &mut store, Keymap::DEFAULT, &fault, &log);
    assert_eq!(c.startup(0), Some(LoadOrigin::FreshInstall));
    assert_eq!(c.state().index, 20);
}

#[test]
fn test_record_failure_latches_fault() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = Controller::new(RecordingPot::new(), FailingStore::new(false, true), Keymap::DEFAULT, &fault, &log);
    c.startup(0);
    c.handle_code(0, VOL_UP);

    c.handle_code(0, REC);
    assert_eq!(fault.code(), FaultCode::StoreWrite);
    assert_eq!(c.state().index, 21, "state unaffected by failed save");
    assert_eq!(c.last_repeatable(), None);

    // Still fully operational
    c.handle_code(0, VOL_UP);
    assert_eq!(c.state().index, 22);
}

#[test]
fn test_every_volume_change_zeroes_first() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);

    for code in [VOL_UP, REPEAT_CODE, VOL_DOWN, MUTE, MAX, VOL_DOWN, REPEAT_CODE] {
        c.pot_mut().clear();
        let before = c.state().index;
        c.handle_code(0, code);
        if c.state().index == before {
            continue;
        }

        let pot = c.attenuator().pot();
        let first_up = pot
            .events
            .iter()
            .position(|e| *e == common::PotEvent::Dir(Direction::Up))
            .unwrap_or(pot.events.len());
        let head = RecordingPot { events: pot.events[..first_up].to_vec() };
        assert_eq!(head.count(Direction::Down, Channel::Left), POT_STEPS as usize);
        assert_eq!(head.count(Direction::Down, Channel::Right), POT_STEPS as usize);
        assert_eq!(pot.count(Direction::Down, Channel::Left), POT_STEPS as usize);
    }
}

#[test]
fn test_poll_loop() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);
    let mut rx = ScriptedReceiver::new(&[VOL_UP, REPEAT_CODE, UNBOUND, BAL_UP]);

    let mut polls = 0;
    while c.poll(polls * 100_000, &mut rx) {
        polls += 1;
    }

    assert_eq!(polls, 4);
    assert_eq!(rx.resumes.get(), 4, "receiver re-armed after every code");
    assert_eq!(c.state(), VolumeState { index: 22, balance: 101 });
    assert!(!c.poll(0, &mut rx));
}

#[test]
fn test_logs_commands() {
    let fault = FaultState::new();
    let log: LogStream = LogStream::new();
    let mut c = started(MemoryStore::new(), &fault, &log);
    while log.drain().is_some() {}

    c.handle_code(1234, MUTE);

    if cfg!(feature = "diagnostics") {
        let entry = log.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1234);
        assert!(entry.message().starts_with("mute -> vol=0"), "{}", entry.message());
    } else {
        assert!(log.drain().is_none());
    }
}
