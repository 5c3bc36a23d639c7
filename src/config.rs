//! Shade controller configuration.
//!
//! Fixed at construction; the controller never mutates it.  Board
//! descriptions can be supplied as JSON (see [`ShadeConfig::from_json`]);
//! any field left out takes its value from [`ShadeConfig::default`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::adapters::eeprom::EEPROM_SIZE;
use crate::error::{Error, Result};
use crate::fsm::Endpoint;
use crate::pins::{self, PinId};
use crate::timeouts::{RECORD_SLOT_LEN, TimeoutRecord};

/// Capacity of the device name, in bytes.
pub const NAME_CAPACITY: usize = 24;

/// Largest duty value the PWM peripheral accepts.
pub const MAX_PWM_DUTY: u16 = (1 << pins::PWM_RESOLUTION_BITS) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadeConfig {
    /// Prefix of every status line and first token of every command line.
    pub name: heapless::String<NAME_CAPACITY>,

    // --- Limit switches ---
    /// `None` when no switch is fitted.  In JSON, `0` also means "none".
    #[serde(deserialize_with = "optional_pin")]
    pub open_switch_pin: Option<PinId>,
    #[serde(deserialize_with = "optional_pin")]
    pub close_switch_pin: Option<PinId>,
    /// Switches read HIGH when tripped.
    pub switch_active_high: bool,
    pub switch_pull_up: bool,

    // --- Motor ---
    pub motor_open_pin: PinId,
    pub motor_close_pin: PinId,
    pub motor_pwm_pin: PinId,
    pub pwm_duty: u16,
    /// Flip every direction level.
    pub invert_output: bool,

    // --- Startup / persistence ---
    /// Position to drive to at startup.  `None` leaves the shade alone.
    pub desired_start: Option<Endpoint>,
    pub default_open_timeout_secs: u32,
    pub default_close_timeout_secs: u32,
    /// Byte offset of the timeout record in stable storage.
    pub storage_offset: usize,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        let mut name = heapless::String::new();
        let _ = name.push_str("shade");
        Self {
            name,
            open_switch_pin: Some(pins::OPEN_SWITCH_GPIO),
            close_switch_pin: Some(pins::CLOSE_SWITCH_GPIO),
            switch_active_high: false,
            switch_pull_up: true,
            motor_open_pin: pins::MOTOR_OPEN_GPIO,
            motor_close_pin: pins::MOTOR_CLOSE_GPIO,
            motor_pwm_pin: pins::MOTOR_PWM_GPIO,
            pwm_duty: MAX_PWM_DUTY,
            invert_output: false,
            desired_start: None,
            default_open_timeout_secs: 60,
            default_close_timeout_secs: 60,
            storage_offset: 0,
        }
    }
}

impl ShadeConfig {
    /// Default wiring under a different name.
    pub fn named(name: &str) -> Result<Self> {
        let mut config = Self::default();
        config.name.clear();
        config
            .name
            .push_str(name)
            .map_err(|()| Error::Config("name too long"))?;
        Ok(config)
    }

    /// Parse a JSON board description and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("name is empty"));
        }
        if self.name.contains(' ') {
            return Err(Error::Config("name contains a space"));
        }

        let motor = [self.motor_open_pin, self.motor_close_pin, self.motor_pwm_pin];
        if motor[0] == motor[1] || motor[0] == motor[2] || motor[1] == motor[2] {
            return Err(Error::Config("motor pins must be distinct"));
        }

        for pin in [self.open_switch_pin, self.close_switch_pin].into_iter().flatten() {
            if motor.contains(&pin) {
                return Err(Error::Config("switch pin shared with motor"));
            }
        }
        if self.open_switch_pin.is_some() && self.open_switch_pin == self.close_switch_pin {
            return Err(Error::Config("switch pins must be distinct"));
        }

        if self.pwm_duty > MAX_PWM_DUTY {
            return Err(Error::Config("PWM duty above resolution"));
        }

        if self
            .storage_offset
            .checked_add(RECORD_SLOT_LEN)
            .is_none_or(|end| end > EEPROM_SIZE)
        {
            return Err(Error::Config("timeout record past end of storage"));
        }
        Ok(())
    }

    pub fn default_timeouts(&self) -> TimeoutRecord {
        TimeoutRecord::new(
            self.default_open_timeout_secs,
            self.default_close_timeout_secs,
        )
    }
}

fn optional_pin<'de, D: Deserializer<'de>>(d: D) -> core::result::Result<Option<PinId>, D::Error> {
    let raw = Option::<u8>::deserialize(d)?;
    Ok(raw.and_then(pins::pin_from_raw))
}
