//! Actuator and input drivers built on the [`DigitalIoPort`] boundary.
//!
//! [`DigitalIoPort`]: crate::app::ports::DigitalIoPort

pub mod motor;
pub mod switch;
