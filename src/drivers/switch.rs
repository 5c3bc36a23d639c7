//! Limit-switch reader.
//!
//! Turns a raw pin level into "tripped / not tripped" so that nothing above
//! this module cares how the switch is wired.
//!
//! | Wiring                          | `active_level` | `pull_up` |
//! |---------------------------------|----------------|-----------|
//! | Switch to GND, internal pull-up | Low            | true      |
//! | Switch to VCC, external pull-dn | High           | false     |

use embedded_hal::digital::PinState;

use crate::app::ports::{DigitalIoPort, PinMode};
use crate::pins::PinId;

/// Electrical convention shared by both limit switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPolarity {
    /// Level that means "tripped".
    pub active_level: PinState,
    /// Enable the internal pull-up on the input.
    pub pull_up: bool,
}

impl SignalPolarity {
    pub const fn new(active_high: bool, pull_up: bool) -> Self {
        Self {
            active_level: if active_high {
                PinState::High
            } else {
                PinState::Low
            },
            pull_up,
        }
    }

    /// Logical state for a raw level.
    pub fn is_active(self, raw: PinState) -> bool {
        raw == self.active_level
    }

    pub fn input_mode(self) -> PinMode {
        if self.pull_up {
            PinMode::InputPullUp
        } else {
            PinMode::Input
        }
    }
}

/// One limit switch, possibly not fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchReader {
    pin: Option<PinId>,
    polarity: SignalPolarity,
}

impl SwitchReader {
    pub const fn new(pin: Option<PinId>, polarity: SignalPolarity) -> Self {
        Self { pin, polarity }
    }

    pub fn is_fitted(&self) -> bool {
        self.pin.is_some()
    }

    pub fn pin(&self) -> Option<PinId> {
        self.pin
    }

    /// Configure the input.  No-op when not fitted.
    pub fn configure(&self, io: &mut impl DigitalIoPort) {
        if let Some(pin) = self.pin {
            io.configure_pin(pin, self.polarity.input_mode());
        }
    }

    /// `true` when fitted and tripped.  An absent switch is never active.
    pub fn is_active(&self, io: &impl DigitalIoPort) -> bool {
        self.pin
            .is_some_and(|pin| self.polarity.is_active(io.read_input(pin)))
    }

    /// `None` when not fitted, otherwise the logical state.
    pub fn sample(&self, io: &impl DigitalIoPort) -> Option<bool> {
        self.pin
            .map(|pin| self.polarity.is_active(io.read_input(pin)))
    }
}
