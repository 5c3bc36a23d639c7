//! Persistent travel timeouts.
//!
//! The open and close timeouts live in a fixed slot of stable storage as a
//! postcard-encoded [`TimeoutRecord`].  A slot that does not decode, or
//! that holds a value above [`TIMEOUT_CEILING_SECS`], is treated as never
//! written: the caller's defaults replace it and are written back
//! immediately.
//!
//! ```text
//!  offset ─▶ ┌──────────────────────────────┐
//!            │ open_secs  (varint, ≤ 5 B)   │
//!            │ close_secs (varint, ≤ 5 B)   │
//!            └──────────────────────────────┘  RECORD_SLOT_LEN bytes
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::StoragePort;
use crate::error::Result;

/// Largest timeout (seconds) accepted from storage.
pub const TIMEOUT_CEILING_SECS: u32 = 150;

/// Bytes reserved for the record.
pub const RECORD_SLOT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Open/close travel timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutRecord {
    pub open_secs: u32,
    pub close_secs: u32,
}

impl TimeoutRecord {
    pub const fn new(open_secs: u32, close_secs: u32) -> Self {
        Self {
            open_secs,
            close_secs,
        }
    }

    /// Both values within the sanity ceiling.
    pub fn is_plausible(&self) -> bool {
        self.open_secs <= TIMEOUT_CEILING_SECS && self.close_secs <= TIMEOUT_CEILING_SECS
    }

    /// Open timeout in clock milliseconds, saturating at `u32::MAX`.
    pub fn open_ms(&self) -> u32 {
        self.open_secs.saturating_mul(1000)
    }

    /// Close timeout in clock milliseconds, saturating at `u32::MAX`.
    pub fn close_ms(&self) -> u32 {
        self.close_secs.saturating_mul(1000)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Reads and writes the timeout record at a fixed storage offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutStore {
    offset: usize,
}

impl TimeoutStore {
    pub const fn new(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Load the effective timeouts, recovering to `defaults` when the slot
    /// is unreadable, undecodable, or implausible.  Never fails: storage
    /// errors are logged and the defaults stay in effect.
    pub fn load(&self, storage: &mut impl StoragePort, defaults: TimeoutRecord) -> TimeoutRecord {
        match self.read(storage) {
            Ok(Some(record)) if record.is_plausible() => {
                info!(
                    "TimeoutStore: loaded open={}s close={}s",
                    record.open_secs, record.close_secs
                );
                return record;
            }
            Ok(Some(record)) => {
                info!(
                    "TimeoutStore: stored open={}s close={}s exceeds {}s, using defaults",
                    record.open_secs, record.close_secs, TIMEOUT_CEILING_SECS
                );
            }
            Ok(None) => info!("TimeoutStore: slot uninitialised, using defaults"),
            Err(e) => warn!("TimeoutStore: read failed ({}), using defaults", e),
        }

        if let Err(e) = self.save(storage, defaults) {
            warn!("TimeoutStore: could not persist defaults: {}", e);
        }
        defaults
    }

    /// Write both timeouts and commit.  The whole slot is written, so an
    /// offset that `read` cannot reach fails here instead.
    pub fn save(&self, storage: &mut impl StoragePort, record: TimeoutRecord) -> Result<()> {
        let mut slot = [0u8; RECORD_SLOT_LEN];
        postcard::to_slice(&record, &mut slot)?;
        storage.store(self.offset, &slot)?;
        storage.commit()?;
        info!(
            "TimeoutStore: saved open={}s close={}s",
            record.open_secs, record.close_secs
        );
        Ok(())
    }

    /// Raw slot read.  `Ok(None)` when the bytes do not decode.
    pub fn read(&self, storage: &mut impl StoragePort) -> Result<Option<TimeoutRecord>> {
        let mut slot = [0u8; RECORD_SLOT_LEN];
        storage.load(self.offset, &mut slot)?;
        Ok(postcard::from_bytes(&slot).ok())
    }
}
