//! Unified error types for the shade controller.
//!
//! A single `Error` enum that every subsystem can convert into.  All
//! variants are `Copy` so they can be logged and dropped by the control
//! loop without allocation.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The stable-storage backend rejected a read, write, or commit.
    Storage(StorageError),
    /// A persisted record could not be encoded or decoded.
    Codec,
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Codec => write!(f, "record codec failure"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<postcard::Error> for Error {
    fn from(_: postcard::Error) -> Self {
        Self::Codec
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
