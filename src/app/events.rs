//! Outbound status reports.
//!
//! Each report renders as the payload of one status line; the
//! [`ShadeController`](super::service::ShadeController) prefixes the device
//! name before handing it to the [`StatusSink`](super::ports::StatusSink).

use core::fmt;

use crate::fsm::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReport {
    Position(Position),
    OpenTimeout(u32),
    CloseTimeout(u32),
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(p) => f.write_str(p.as_str()),
            Self::OpenTimeout(secs) => write!(f, "opentimeout:{secs}"),
            Self::CloseTimeout(secs) => write!(f, "closetimeout:{secs}"),
        }
    }
}
