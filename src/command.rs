//! Remote commands and the code table that maps remote buttons to them.
//!
//! The table is data: a different remote only needs a different
//! `&'static [KeyBinding]`.

/// Actions the attenuator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Mute,
    MaxVolume,
    VolumeUp,
    VolumeDown,
    /// Persist the current state
    Record,
    BalanceUp,
    BalanceDown,
    BalanceReset,
    /// "Key still held": replay the last volume step
    Repeat,
}

impl Command {
    /// Short name for log output.
    pub fn name(self) -> &'static str {
        match self {
            Command::Mute => "mute",
            Command::MaxVolume => "max",
            Command::VolumeUp => "vol+",
            Command::VolumeDown => "vol-",
            Command::Record => "record",
            Command::BalanceUp => "bal+",
            Command::BalanceDown => "bal-",
            Command::BalanceReset => "bal0",
            Command::Repeat => "repeat",
        }
    }

    /// The repeatable form of this command, if it has one.
    pub fn repeatable(self) -> Option<Repeatable> {
        match self {
            Command::VolumeUp => Some(Repeatable::VolumeUp),
            Command::VolumeDown => Some(Repeatable::VolumeDown),
            _ => None,
        }
    }
}

/// Commands a held key may repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeatable {
    VolumeUp,
    VolumeDown,
}

impl From<Repeatable> for Command {
    fn from(r: Repeatable) -> Self {
        match r {
            Repeatable::VolumeUp => Command::VolumeUp,
            Repeatable::VolumeDown => Command::VolumeDown,
        }
    }
}

/// One remote button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    /// Decoded 32-bit code
    pub code: u32,
    /// Label printed on the button
    pub label: &'static str,
    pub command: Command,
}

/// Code sent while a key is held (NEC repeat frame).
pub const REPEAT_CODE: u32 = 0xFFFF_FFFF;

/// Bindings for the stock 21-key NEC remote.
pub const DEFAULT_BINDINGS: &[KeyBinding] = &[
    KeyBinding { code: 0x00FF_B24D, label: "MUTE", command: Command::Mute },
    KeyBinding { code: 0x00FF_6897, label: "MAX", command: Command::MaxVolume },
    KeyBinding { code: 0x00FF_7887, label: "VOL+", command: Command::VolumeUp },
    KeyBinding { code: 0x00FF_50AF, label: "VOL-", command: Command::VolumeDown },
    KeyBinding { code: 0x00FF_32CD, label: "REC", command: Command::Record },
    KeyBinding { code: 0x00FF_E817, label: "9", command: Command::BalanceUp },
    KeyBinding { code: 0x00FF_8877, label: "7", command: Command::BalanceDown },
    KeyBinding { code: 0x00FF_A857, label: "8", command: Command::BalanceReset },
    KeyBinding { code: REPEAT_CODE, label: "(held)", command: Command::Repeat },
];

/// Remote code table.
#[derive(Clone, Copy, Debug)]
pub struct Keymap {
    bindings: &'static [KeyBinding],
}

impl Keymap {
    /// Table for the stock remote.
    pub const DEFAULT: Self = Self::new(DEFAULT_BINDINGS);

    /// Build from a binding table. The first binding for a code wins.
    pub const fn new(bindings: &'static [KeyBinding]) -> Self {
        Self { bindings }
    }

    /// Command for `code`, or `None` if the code is not bound.
    pub fn lookup(&self, code: u32) -> Option<Command> {
        self.binding(code).map(|b| b.command)
    }

    /// Full binding for `code`.
    pub fn binding(&self, code: u32) -> Option<&'static KeyBinding> {
        let bindings: &'static [KeyBinding] = self.bindings;
        bindings.iter().find(|b| b.code == code)
    }

    /// All bindings, in table order.
    pub fn bindings(&self) -> &'static [KeyBinding] {
        self.bindings
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::DEFAULT
    }
}
