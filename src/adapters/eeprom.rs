//! EEPROM-style storage adapter.
//!
//! Presents a flat byte region through [`StoragePort`].  Reads and writes
//! hit a RAM mirror; [`commit`](StoragePort::commit) pushes the mirror to
//! flash.
//!
//! - **`target_os = "espidf"`**: the mirror is one NVS blob
//!   (`shadectl::eeprom`), loaded at construction and rewritten on commit.
//!   NVS commits are atomic, so a power cut never leaves a torn record.
//! - **`not(target_os = "espidf")`**: RAM only; commits are counted so
//!   tests can check that every logical write was flushed.
//!
//! A fresh region reads as `0xFF`, like erased flash.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::app::ports::{StorageError, StoragePort};

/// Size of the emulated region.
pub const EEPROM_SIZE: usize = 512;

#[cfg(target_os = "espidf")]
const NVS_NAMESPACE: &[u8] = b"shadectl\0";
#[cfg(target_os = "espidf")]
const NVS_KEY: &[u8] = b"eeprom\0";

pub struct EepromAdapter {
    mirror: [u8; EEPROM_SIZE],
    dirty: bool,
    commits: usize,
}

impl Default for EepromAdapter {
    fn default() -> Self {
        Self::erased()
    }
}

impl EepromAdapter {
    /// A region that reads as erased flash.  Touches no hardware.
    pub fn erased() -> Self {
        Self {
            mirror: [0xFF; EEPROM_SIZE],
            dirty: false,
            commits: 0,
        }
    }

    /// Initialise NVS and load the mirror from flash.
    ///
    /// A missing blob leaves the region erased.  On first boot or after a
    /// version mismatch the NVS partition is wiped and re-initialised.
    #[cfg(target_os = "espidf")]
    pub fn open() -> Result<Self, StorageError> {
        // SAFETY: called once from main() before any other NVS user.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
            warn!("EepromAdapter: erasing and re-initialising NVS partition");
            if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                return Err(StorageError::IoError);
            }
        } else if ret != ESP_OK {
            return Err(StorageError::IoError);
        }

        let mut adapter = Self::erased();
        let result = with_nvs_handle(false, |handle| {
            let mut size = EEPROM_SIZE;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    adapter.mirror.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(size)
        });
        match result {
            Ok(size) => info!("EepromAdapter: loaded {} bytes from NVS", size),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                info!("EepromAdapter: no blob yet, region erased");
            }
            Err(e) => {
                warn!("EepromAdapter: NVS read error {}, region erased", e);
                adapter.mirror = [0xFF; EEPROM_SIZE];
            }
        }
        Ok(adapter)
    }

    /// Host stand-in for the flash-backed constructor.
    #[cfg(not(target_os = "espidf"))]
    pub fn open() -> Result<Self, StorageError> {
        info!("EepromAdapter: simulation backend ({} bytes)", EEPROM_SIZE);
        Ok(Self::erased())
    }

    /// Writes not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Successful commits since construction.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Raw view of the mirror.
    pub fn bytes(&self) -> &[u8] {
        &self.mirror
    }

    fn range(offset: usize, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let end = offset.checked_add(len).ok_or(StorageError::OutOfRange)?;
        if end > EEPROM_SIZE {
            return Err(StorageError::OutOfRange);
        }
        Ok(offset..end)
    }

    #[cfg(target_os = "espidf")]
    fn flush(&self) -> Result<(), StorageError> {
        let result = with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    self.mirror.as_ptr() as *const _,
                    EEPROM_SIZE,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            warn!("EepromAdapter: NVS write error {}", e);
            StorageError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl StoragePort for EepromAdapter {
    fn load(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, buf.len())?;
        buf.copy_from_slice(&self.mirror[range]);
        Ok(())
    }

    fn store(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let range = Self::range(offset, data.len())?;
        self.mirror[range].copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        self.flush()?;
        self.dirty = false;
        self.commits += 1;
        Ok(())
    }
}

/// Open the adapter's NVS namespace, run `f`, close.
#[cfg(target_os = "espidf")]
fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
where
    F: FnOnce(nvs_handle_t) -> Result<T, i32>,
{
    let mode = if write {
        nvs_open_mode_t_NVS_READWRITE
    } else {
        nvs_open_mode_t_NVS_READONLY
    };
    let mut handle: nvs_handle_t = 0;
    // SAFETY: namespace is NUL-terminated; handle closed below.
    let ret = unsafe { nvs_open(NVS_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
    if ret != ESP_OK {
        return Err(ret);
    }
    let result = f(handle);
    unsafe { nvs_close(handle) };
    result
}
