//! Port traits: the hexagonal boundary between the shade controller and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ShadeController (domain)
//! ```
//!
//! Driven adapters (pins, clock, storage, status transport) implement these
//! traits.  The [`ShadeController`](super::service::ShadeController) is
//! generic over them, so the domain core never touches hardware directly.

use std::rc::Rc;

use embedded_hal::digital::PinState;

use crate::pins::PinId;

// ───────────────────────────────────────────────────────────────
// Digital / analog I/O port
// ───────────────────────────────────────────────────────────────

/// Electrical mode of a GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Floating input (external pull resistor expected).
    Input,
    /// Input with the internal pull-up enabled.
    InputPullUp,
    /// Push-pull output.
    Output,
}

/// Raw pin access.  Levels are electrical, not logical: polarity is
/// resolved by the callers.
pub trait DigitalIoPort {
    fn configure_pin(&mut self, pin: PinId, mode: PinMode);

    fn write_output(&mut self, pin: PinId, level: PinState);

    fn read_input(&self, pin: PinId) -> PinState;

    /// Set the PWM duty on `pin` (0 = off).
    fn write_analog(&mut self, pin: PinId, duty: u16);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
///
/// Wraps at `u32::MAX` (about 49.7 days).  Deadline comparisons in the
/// controller are plain `now > deadline`, so a travel that straddles the
/// wrap expires early.  Timeouts are converted to milliseconds with
/// saturation, but the deadline is `now` plus that value with wrapping:
/// a timeout near `u32::MAX` ms started at a non-zero `now` expires on
/// the first poll.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Storage port (byte-addressed stable storage)
// ───────────────────────────────────────────────────────────────

/// EEPROM-style byte storage.
///
/// Writes land in the backing medium immediately or after [`commit`],
/// depending on the implementation.  Callers always call `commit` after a
/// logical write.
///
/// [`commit`]: StoragePort::commit
pub trait StoragePort {
    /// Fill `buf` with the bytes starting at `offset`.
    fn load(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`.
    fn store(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Flush buffered writes.  Media without a write cache need nothing.
    fn commit(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Status sink (domain → hub)
// ───────────────────────────────────────────────────────────────

/// Outbound status channel.  Fire-and-forget: the controller never learns
/// whether a line was delivered.
pub trait StatusSink {
    /// Deliver one `"<name> <payload>"` line.
    fn send_status(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Pending-timer counter (owned by the scheduler)
// ───────────────────────────────────────────────────────────────

/// Cross-instance count of shades with a travel timer running.
///
/// Owned by the scheduler and handed to each controller at construction.
/// Controllers only touch it on their own transition edges.
pub trait PendingCounter {
    fn increment(&self);

    /// Decrement, saturating at zero.
    fn decrement(&self);

    fn pending(&self) -> u32;
}

impl<T: PendingCounter + ?Sized> PendingCounter for &T {
    fn increment(&self) {
        (**self).increment();
    }

    fn decrement(&self) {
        (**self).decrement();
    }

    fn pending(&self) -> u32 {
        (**self).pending()
    }
}

impl<T: PendingCounter + ?Sized> PendingCounter for Rc<T> {
    fn increment(&self) {
        (**self).increment();
    }

    fn decrement(&self) {
        (**self).decrement();
    }

    fn pending(&self) -> u32 {
        (**self).pending()
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The requested range lies outside the storage region.
    OutOfRange,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "offset out of range"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
