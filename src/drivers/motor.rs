//! Shade motor driver (L298N-style H-bridge).
//!
//! Two direction inputs plus a PWM enable line.  With `invert_output` set,
//! every direction level is flipped for boards that drive the bridge
//! through inverting buffers.
//!
//! | Action | open pin | close pin | PWM  |
//! |--------|----------|-----------|------|
//! | Open   | active   | inactive  | duty |
//! | Close  | inactive | active    | duty |
//! | Stop   | inactive | inactive  | 0    |
//!
//! The driver is a dumb actuator; it keeps no state beyond its wiring.

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::ports::{DigitalIoPort, PinMode};
use crate::pins::PinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorDriver {
    open_pin: PinId,
    close_pin: PinId,
    pwm_pin: PinId,
    duty: u16,
    invert_output: bool,
}

impl MotorDriver {
    pub const fn new(
        open_pin: PinId,
        close_pin: PinId,
        pwm_pin: PinId,
        duty: u16,
        invert_output: bool,
    ) -> Self {
        Self {
            open_pin,
            close_pin,
            pwm_pin,
            duty,
            invert_output,
        }
    }

    /// Configure all three outputs.
    pub fn configure(&self, io: &mut impl DigitalIoPort) {
        io.configure_pin(self.open_pin, PinMode::Output);
        io.configure_pin(self.close_pin, PinMode::Output);
        io.configure_pin(self.pwm_pin, PinMode::Output);
    }

    pub fn drive(&self, io: &mut impl DigitalIoPort, direction: Direction) {
        let (open, close) = match direction {
            Direction::Open => (true, false),
            Direction::Close => (false, true),
        };
        debug!("motor: drive {:?} at duty {}", direction, self.duty);
        io.write_output(self.open_pin, self.level(open));
        io.write_output(self.close_pin, self.level(close));
        io.write_analog(self.pwm_pin, self.duty);
    }

    pub fn stop(&self, io: &mut impl DigitalIoPort) {
        debug!("motor: stop");
        io.write_output(self.open_pin, self.level(false));
        io.write_output(self.close_pin, self.level(false));
        io.write_analog(self.pwm_pin, 0);
    }

    /// Electrical level for a logical "asserted" value.
    pub fn level(&self, asserted: bool) -> PinState {
        PinState::from(asserted != self.invert_output)
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}
