//! Log-based status sink.
//!
//! Implements [`StatusSink`] by writing each status line to the ESP-IDF
//! logger (UART / USB-CDC in production), where the hub's serial bridge
//! picks it up.  A future MQTT adapter would implement the same trait.

use log::info;

use crate::app::ports::StatusSink;

#[derive(Debug, Default)]
pub struct LogStatusSink {
    sent: u32,
}

impl LogStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines sent since boot.
    pub fn sent(&self) -> u32 {
        self.sent
    }
}

impl StatusSink for LogStatusSink {
    fn send_status(&mut self, line: &str) {
        self.sent = self.sent.wrapping_add(1);
        info!("STATUS | {}", line);
    }
}
