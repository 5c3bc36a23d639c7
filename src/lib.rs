//! shadectl: DC motor window-shade controller.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; host builds get
//! simulation backends.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod scheduler;
pub mod timeouts;
