//! Runtime state owned by one shade controller.
//!
//! `TravelContext` is what the transition rules read: current position,
//! the pending travel deadline, and the effective timeouts.  `SwitchReads`
//! is the per-poll input snapshot.

use super::Position;
use crate::timeouts::TimeoutRecord;

// ---------------------------------------------------------------------------
// Switch snapshot
// ---------------------------------------------------------------------------

/// Logical state of the limit switches at one instant.
///
/// `None` means no switch is fitted at that end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchReads {
    pub open: Option<bool>,
    pub close: Option<bool>,
}

impl SwitchReads {
    pub fn open_fitted(&self) -> bool {
        self.open.is_some()
    }

    pub fn close_fitted(&self) -> bool {
        self.close.is_some()
    }

    pub fn open_active(&self) -> bool {
        self.open == Some(true)
    }

    pub fn close_active(&self) -> bool {
        self.close == Some(true)
    }
}

// ---------------------------------------------------------------------------
// TravelContext
// ---------------------------------------------------------------------------

/// Mutable per-shade runtime fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelContext {
    pub position: Position,
    /// Travel deadline in clock milliseconds.  Meaningful only while
    /// `timer_pending` is set.
    pub deadline_ms: u32,
    pub timer_pending: bool,
    /// Effective timeouts (seconds); may differ from the configured defaults.
    pub timeouts: TimeoutRecord,
}

impl TravelContext {
    pub fn new(timeouts: TimeoutRecord) -> Self {
        Self {
            position: Position::Unknown,
            deadline_ms: 0,
            timer_pending: false,
            timeouts,
        }
    }

    /// `true` once the clock has passed the pending deadline.
    pub fn deadline_passed(&self, now_ms: u32) -> bool {
        self.timer_pending && now_ms > self.deadline_ms
    }
}
