//! NVS-backed byte store.
//!
//! Gives the persistence layer EEPROM semantics on top of ESP-IDF NVS:
//! one `u8` entry per byte offset (key `b<offset>`) in a private namespace.
//! A key that was never set reads as the erased value 0xFF, exactly like a
//! blank EEPROM cell.

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::*;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

#[cfg(target_os = "espidf")]
use crate::persist::{ByteStore, SENTINEL};

#[cfg(target_os = "espidf")]
extern crate alloc;
#[cfg(target_os = "espidf")]
use alloc::format;

/// NVS namespace for the attenuator state
pub const NVS_NAMESPACE: &str = "attenuator";

/// NVS operation errors
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    #[cfg(target_os = "espidf")]
    InitFailed(EspError),
    /// NVS read/write error
    #[cfg(target_os = "espidf")]
    IoError(EspError),
    /// Feature not available on this platform
    #[cfg(not(target_os = "espidf"))]
    NotAvailable,
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

/// Byte store over an NVS namespace.
#[cfg(target_os = "espidf")]
pub struct NvsByteStore {
    storage: EspNvs<NvsDefault>,
}

#[cfg(target_os = "espidf")]
impl NvsByteStore {
    /// Open (creating if needed) the attenuator namespace.
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self, NvsError> {
        let storage =
            EspNvs::new(partition, NVS_NAMESPACE, true).map_err(NvsError::InitFailed)?;
        Ok(Self { storage })
    }
}

#[cfg(target_os = "espidf")]
impl ByteStore for NvsByteStore {
    type Error = NvsError;

    fn read_byte(&mut self, offset: u16) -> Result<u8, Self::Error> {
        let key = format!("b{}", offset);
        Ok(self.storage.get_u8(&key)?.unwrap_or(SENTINEL))
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), Self::Error> {
        let key = format!("b{}", offset);
        self.storage.set_u8(&key, value)?;
        Ok(())
    }
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub struct NvsByteStore {
    _private: (),
}

#[cfg(not(target_os = "espidf"))]
impl NvsByteStore {
    /// Always fails off-target; use `persist::MemoryStore` instead.
    pub fn open() -> Result<Self, NvsError> {
        Err(NvsError::NotAvailable)
    }
}
