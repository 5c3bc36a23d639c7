//! Mock adapters for integration tests.
//!
//! Records every pin call so tests can assert on the full I/O history
//! without touching real GPIO/PWM registers.

use std::collections::HashMap;

use embedded_hal::digital::PinState;
use shadectl::app::ports::{
    ClockPort, DigitalIoPort, PinMode, StatusSink, StorageError, StoragePort,
};
use shadectl::pins::PinId;

// ── I/O call record ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum IoCall {
    Configure(PinId, PinMode),
    Write(PinId, PinState),
    Analog(PinId, u16),
}

// ── MockBoard ─────────────────────────────────────────────────

/// Pins plus a hand-driven clock.  Unset inputs read HIGH, which is
/// "not tripped" for the default active-low switches.
pub struct MockBoard {
    pub calls: Vec<IoCall>,
    pub inputs: HashMap<PinId, PinState>,
    pub now: u32,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            inputs: HashMap::new(),
            now: 0,
        }
    }

    /// Pull an active-low switch to ground.
    pub fn trip(&mut self, pin: PinId) {
        self.inputs.insert(pin, PinState::Low);
    }

    pub fn release(&mut self, pin: PinId) {
        self.inputs.insert(pin, PinState::High);
    }

    /// Last duty written to `pin`, if any.
    pub fn duty(&self, pin: PinId) -> Option<u16> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::Analog(p, d) if *p == pin => Some(*d),
            _ => None,
        })
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: PinId) -> Option<PinState> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::Write(p, l) if *p == pin => Some(*l),
            _ => None,
        })
    }

    pub fn mode(&self, pin: PinId) -> Option<PinMode> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::Configure(p, m) if *p == pin => Some(*m),
            _ => None,
        })
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalIoPort for MockBoard {
    fn configure_pin(&mut self, pin: PinId, mode: PinMode) {
        self.calls.push(IoCall::Configure(pin, mode));
    }

    fn write_output(&mut self, pin: PinId, level: PinState) {
        self.calls.push(IoCall::Write(pin, level));
    }

    fn read_input(&self, pin: PinId) -> PinState {
        self.inputs.get(&pin).copied().unwrap_or(PinState::High)
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) {
        self.calls.push(IoCall::Analog(pin, duty));
    }
}

impl ClockPort for MockBoard {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

// ── MockEeprom ────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockEeprom {
    pub bytes: Vec<u8>,
    pub commits: usize,
}

impl MockEeprom {
    pub fn erased() -> Self {
        Self {
            bytes: vec![0xFF; 64],
            commits: 0,
        }
    }
}

impl StoragePort for MockEeprom {
    fn load(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let src = self
            .bytes
            .get(offset..offset + buf.len())
            .ok_or(StorageError::OutOfRange)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn store(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        self.bytes
            .get_mut(offset..offset + data.len())
            .ok_or(StorageError::OutOfRange)?
            .copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.commits += 1;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl StatusSink for RecordingSink {
    fn send_status(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
