//! Scheduler-side bookkeeping shared by every shade on the board.
//!
//! The scheduler owns one [`PendingTimers`] and lends it to each
//! [`ShadeController`](crate::app::service::ShadeController), either by
//! reference or through an `Rc`.  Controllers bump it on their travel
//! edges; the scheduler reads it to decide whether it can drop to a slow
//! polling cadence.
//!
//! ```text
//!   shade A ──┐
//!   shade B ──┼──▶ PendingTimers ──▶ scheduler: any_pending()?
//!   shade C ──┘
//! ```

use core::cell::Cell;

use crate::app::ports::PendingCounter;

/// Count of shades with a travel timer running.
#[derive(Debug, Default)]
pub struct PendingTimers {
    count: Cell<u32>,
}

impl PendingTimers {
    pub const fn new() -> Self {
        Self {
            count: Cell::new(0),
        }
    }

    /// `true` while at least one shade is mid-travel.
    pub fn any_pending(&self) -> bool {
        self.count.get() > 0
    }
}

impl PendingCounter for PendingTimers {
    fn increment(&self) {
        self.count.set(self.count.get().saturating_add(1));
    }

    fn decrement(&self) {
        self.count.set(self.count.get().saturating_sub(1));
    }

    fn pending(&self) -> u32 {
        self.count.get()
    }
}
