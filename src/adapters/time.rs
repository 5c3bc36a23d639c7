//! Monotonic millisecond clock.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer.
//! - **`not(target_os = "espidf")`**: `std::time::Instant` plus a manual
//!   offset, so host simulations can fast-forward travel timeouts.
//!
//! Both truncate to `u32`, wrapping after about 49.7 days.

use crate::app::ports::ClockPort;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(not(target_os = "espidf"))]
    offset_ms: core::cell::Cell<u32>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(not(target_os = "espidf"))]
            offset_ms: core::cell::Cell::new(0),
        }
    }

    /// Jump the simulated clock forward.
    #[cfg(not(target_os = "espidf"))]
    pub fn advance(&self, ms: u32) {
        self.offset_ms.set(self.offset_ms.get().wrapping_add(ms));
    }
}

impl ClockPort for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u32 {
        // SAFETY: esp_timer_get_time is a read of the RTC-backed counter.
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u32 {
        (self.start.elapsed().as_millis() as u32).wrapping_add(self.offset_ms.get())
    }
}
