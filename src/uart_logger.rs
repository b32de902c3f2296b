//! Serial diagnostics output.
//!
//! Drains a [`LogStream`] into any `core::fmt::Write` sink between polls.
//! On ESP-IDF the sink is the console UART (stdout); on host it is the
//! terminal.
//!
//! Line format: `[timestamp_us] LEVEL: message`

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Maximum entries written per drain, so a burst of messages cannot
/// delay the next poll noticeably.
pub const MAX_LINES_PER_DRAIN: usize = 16;

/// Write one entry as a line.
pub fn write_entry<W: Write + ?Sized>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain up to [`MAX_LINES_PER_DRAIN`] entries into `out`.
///
/// Reports and resets the dropped-message counter when it is non-zero.
/// Returns the number of entries written.
pub fn drain_to<W: Write + ?Sized, const N: usize>(stream: &LogStream<N>, out: &mut W) -> usize {
    let mut written = 0;

    while written < MAX_LINES_PER_DRAIN {
        let Some(entry) = stream.drain() else {
            break;
        };
        if write_entry(out, &entry).is_err() {
            break;
        }
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = writeln!(out, "[{:10}] WARN: {} log messages dropped", "", dropped);
        stream.reset_dropped();
    }

    written
}
