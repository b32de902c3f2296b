//! NEC infrared frame decoder
//!
//! Input is the captured envelope as alternating mark/space durations in
//! microseconds, starting with the leader mark.
//!
//! ```text
//! data:    [9000 mark][4500 space] 32 × ([560 mark][560 | 1690 space]) [560 mark]
//! repeat:  [9000 mark][2250 space][560 mark]
//! ```
//!
//! Bits are assembled MSB first, so the stock remote's VOL+ button reads
//! as `0x00FF7887` (address 0x00, !address, command 0x78, !command).
//! A repeat frame is reported as [`REPEAT_CODE`].

use crate::command::REPEAT_CODE;

pub const LEADER_MARK_US: u32 = 9000;
pub const LEADER_SPACE_US: u32 = 4500;
pub const REPEAT_SPACE_US: u32 = 2250;
pub const BIT_MARK_US: u32 = 560;
pub const ZERO_SPACE_US: u32 = 560;
pub const ONE_SPACE_US: u32 = 1690;

/// Data bits per frame
pub const DATA_BITS: usize = 32;

/// Durations in a complete data frame: leader, 32 bit pairs, stop mark
pub const FRAME_LEN: usize = 2 + 2 * DATA_BITS + 1;

/// Decoded NEC frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NecFrame {
    /// 32-bit data frame
    Data(u32),
    /// Key-held repeat frame
    Repeat,
}

impl NecFrame {
    /// Code as seen by the keymap.
    pub fn code(self) -> u32 {
        match self {
            NecFrame::Data(code) => code,
            NecFrame::Repeat => REPEAT_CODE,
        }
    }

    /// True if the command byte is followed by its complement.
    ///
    /// Extended-address remotes do not complement the address, so only
    /// the command half is checked.
    pub fn is_checked(self) -> bool {
        match self {
            NecFrame::Data(code) => {
                let command = (code >> 8) as u8;
                let inverse = code as u8;
                command == !inverse
            }
            NecFrame::Repeat => true,
        }
    }
}

/// Within ±25% of `expected`.
#[inline]
fn matches(measured: u32, expected: u32) -> bool {
    let measured = measured as u64 * 4;
    let expected = expected as u64;
    measured >= expected * 3 && measured <= expected * 5
}

/// Decode one captured frame.
///
/// Returns `None` for anything that is not a well-formed NEC data or
/// repeat frame.
pub fn decode(durations_us: &[u32]) -> Option<NecFrame> {
    let (&leader, rest) = durations_us.split_first()?;
    if !matches(leader, LEADER_MARK_US) {
        return None;
    }

    let (&gap, rest) = rest.split_first()?;

    if matches(gap, REPEAT_SPACE_US) {
        return match rest.first() {
            Some(&stop) if matches(stop, BIT_MARK_US) => Some(NecFrame::Repeat),
            _ => None,
        };
    }

    if !matches(gap, LEADER_SPACE_US) || rest.len() < 2 * DATA_BITS + 1 {
        return None;
    }

    let mut code = 0u32;
    for pair in rest[..2 * DATA_BITS].chunks_exact(2) {
        if !matches(pair[0], BIT_MARK_US) {
            return None;
        }
        let bit = if matches(pair[1], ONE_SPACE_US) {
            1
        } else if matches(pair[1], ZERO_SPACE_US) {
            0
        } else {
            return None;
        };
        code = (code << 1) | bit;
    }

    if !matches(rest[2 * DATA_BITS], BIT_MARK_US) {
        return None;
    }

    Some(NecFrame::Data(code))
}

/// Decode one captured frame into the code seen by the keymap.
///
/// Data frames whose command byte fails its complement are dropped.
pub fn decode_code(durations_us: &[u32]) -> Option<u32> {
    decode(durations_us).filter(|frame| frame.is_checked()).map(NecFrame::code)
}
