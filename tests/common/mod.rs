//! Recording fakes shared by the integration tests.

#![allow(dead_code)]

use core::cell::Cell;

use rust_ir_attenuator::ir::IrReceiver;
use rust_ir_attenuator::persist::ByteStore;
use rust_ir_attenuator::pot::{Channel, Direction, PotInterface};

/// One call into the pot interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotEvent {
    Dir(Direction),
    Pulse(Channel),
}

/// Pot that records every call.
#[derive(Default)]
pub struct RecordingPot {
    pub events: Vec<PotEvent>,
}

impl RecordingPot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pulses grouped into runs of (direction, channel, count).
    ///
    /// Pulses before any direction was set are reported under `Down`.
    pub fn phases(&self) -> Vec<(Direction, Channel, usize)> {
        let mut dir = Direction::Down;
        let mut out: Vec<(Direction, Channel, usize)> = Vec::new();
        for event in &self.events {
            match *event {
                PotEvent::Dir(d) => dir = d,
                PotEvent::Pulse(ch) => match out.last_mut() {
                    Some((d, c, n)) if *d == dir && *c == ch => *n += 1,
                    _ => out.push((dir, ch, 1)),
                },
            }
        }
        out
    }

    /// Total pulses on `channel` while the direction was `dir`.
    pub fn count(&self, dir: Direction, channel: Channel) -> usize {
        self.phases()
            .iter()
            .filter(|(d, c, _)| *d == dir && *c == channel)
            .map(|(_, _, n)| n)
            .sum()
    }

    pub fn pulses(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PotEvent::Pulse(_)))
            .count()
    }
}

impl PotInterface for RecordingPot {
    fn set_direction(&mut self, direction: Direction) {
        self.events.push(PotEvent::Dir(direction));
    }

    fn pulse(&mut self, channel: Channel) {
        self.events.push(PotEvent::Pulse(channel));
    }
}

/// Expected pulse runs for an absolute move to (`left`, `right`).
pub fn expected_position(left_pulses: usize, right_pulses: usize) -> Vec<(Direction, Channel, usize)> {
    let mut out = vec![
        (Direction::Down, Channel::Left, 105),
        (Direction::Down, Channel::Right, 105),
    ];
    if left_pulses > 0 {
        out.push((Direction::Up, Channel::Left, left_pulses));
    }
    if right_pulses > 0 {
        out.push((Direction::Up, Channel::Right, right_pulses));
    }
    out
}

/// Store whose reads and/or writes fail.
pub struct FailingStore {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub bytes: [u8; 4],
}

#[derive(Debug, PartialEq, Eq)]
pub struct StoreDown;

impl FailingStore {
    pub fn new(fail_reads: bool, fail_writes: bool) -> Self {
        Self {
            fail_reads,
            fail_writes,
            bytes: [0xFF; 4],
        }
    }
}

impl ByteStore for FailingStore {
    type Error = StoreDown;

    fn read_byte(&mut self, offset: u16) -> Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(StoreDown);
        }
        Ok(self.bytes[offset as usize])
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(StoreDown);
        }
        self.bytes[offset as usize] = value;
        Ok(())
    }
}

/// Receiver fed from a script of codes.
pub struct ScriptedReceiver {
    codes: Vec<u32>,
    pub resumes: Cell<usize>,
}

impl ScriptedReceiver {
    pub fn new(codes: &[u32]) -> Self {
        let mut codes = codes.to_vec();
        codes.reverse();
        Self {
            codes,
            resumes: Cell::new(0),
        }
    }
}

impl IrReceiver for ScriptedReceiver {
    fn try_decode(&mut self) -> Option<u32> {
        self.codes.last().copied()
    }

    fn resume(&mut self) {
        self.codes.pop();
        self.resumes.set(self.resumes.get() + 1);
    }
}
