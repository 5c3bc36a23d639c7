//! Shade position state machine.
//!
//! ```text
//!              Open ──[close]──▶ Closing ──[close switch]──▶ Closed
//!               ▲                   │
//!               │                   └──[deadline, no switch]──▶ Closed
//!        [open switch]              └──[deadline, switch fitted]──▶ Unknown
//!               │
//!  Closed ──[open]──▶ Opening ──[deadline, no switch]──▶ Open
//!                        └──[deadline, switch fitted]──▶ Unknown
//! ```
//!
//! Only the travel states (`Opening`, `Closing`) are acted on by polling.
//! The transition rules themselves are a pure function in [`states`]; the
//! [`ShadeController`](crate::app::service::ShadeController) applies the
//! motor and notification side effects.

pub mod context;
pub mod states;

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Where the shade is, as far as the controller knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Unknown,
    Open,
    Opening,
    Closed,
    Closing,
}

impl Position {
    /// Status payload reported to the hub.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Open => "open",
            Self::Opening => "opening",
            Self::Closed => "closed",
            Self::Closing => "closing",
        }
    }

    /// `true` while the motor is expected to be running.
    pub const fn is_travelling(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A resting position the shade can be driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Open,
    Closed,
}

impl From<Endpoint> for Position {
    fn from(e: Endpoint) -> Self {
        match e {
            Endpoint::Open => Self::Open,
            Endpoint::Closed => Self::Closed,
        }
    }
}
