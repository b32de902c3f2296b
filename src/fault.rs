//! Fault latch for collaborator I/O errors.
//!
//! The attenuator is open-loop: a failed pin write or store access cannot
//! be retried against anything, and the command flow must not stall on it.
//! Errors are latched here instead, for the diagnostics side channel to
//! report. The control loop keeps running.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes describing the last collaborator failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// A pot line (increment or direction) refused a write.
    /// The wiper position is unknown until the next positioning.
    PinWrite = 1,

    /// The persistent store could not be read.
    /// Defaults were used instead of the stored state.
    StoreRead = 2,

    /// The persistent store could not be written.
    /// The previous stored state is still in effect.
    StoreWrite = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::PinWrite,
            2 => FaultCode::StoreRead,
            3 => FaultCode::StoreWrite,
            _ => FaultCode::None,
        }
    }

    /// Short name for log output.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::PinWrite => "pin-write",
            FaultCode::StoreRead => "store-read",
            FaultCode::StoreWrite => "store-write",
        }
    }
}

/// Latched fault state.
///
/// Atomics so a `static` instance can be shared between the pot driver
/// and the controller without `&mut` juggling.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// // In a collaborator:
/// if store.write_byte(offset, value).is_err() {
///     FAULT.set(FaultCode::StoreWrite, offset as u32);
/// }
///
/// // In the control loop:
/// if let Some(snap) = FAULT.take() {
///     rt_warn!(LOG_STREAM, now_us, "fault {} ({})", snap.code.as_str(), snap.data);
/// }
/// ```
pub struct FaultState {
    /// True if a fault is latched.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (store offset, channel, ...).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault with the given code and data.
    ///
    /// Increments the fault counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is currently latched.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Take the latched fault, clearing it.
    ///
    /// Returns `None` when nothing is latched.
    pub fn take(&self) -> Option<FaultSnapshot> {
        if !self.active.swap(false, Ordering::AcqRel) {
            return None;
        }
        Some(FaultSnapshot {
            active: true,
            code: self.code(),
            data: self.data(),
            count: self.count(),
        })
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
