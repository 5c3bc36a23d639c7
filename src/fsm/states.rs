//! Travel transition rules.
//!
//! A pure function of (context, clock, switch snapshot).  Rules are
//! evaluated in a fixed priority order and the first match wins:
//!
//! | # | Condition                                        | Next               |
//! |---|--------------------------------------------------|--------------------|
//! | 1 | Opening, open switch fitted and active           | Open               |
//! | 2 | Opening, timer pending, deadline passed          | Open / Unknown     |
//! | 3 | Closing, close switch fitted and active          | Closed             |
//! | 4 | Closing, timer pending, deadline passed          | Closed / Unknown   |
//!
//! A timed-out travel only lands on the endpoint when no switch is fitted
//! at that end; if a switch was fitted and never tripped, the result is
//! `Unknown`.

use super::Position;
use super::context::{SwitchReads, TravelContext};

/// Why a travel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    OpenSwitch,
    OpenTimeout,
    CloseSwitch,
    CloseTimeout,
}

/// Outcome of a poll that ends a travel: the motor must be stopped, the
/// position set to `next`, and the new position reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Position,
    pub cause: TransitionCause,
}

/// Evaluate the travel rules.  Returns `None` when nothing fires.
pub fn evaluate(ctx: &TravelContext, now_ms: u32, reads: SwitchReads) -> Option<Transition> {
    let opening = ctx.position == Position::Opening;
    let closing = ctx.position == Position::Closing;

    if opening && reads.open_active() {
        return Some(Transition {
            next: Position::Open,
            cause: TransitionCause::OpenSwitch,
        });
    }

    if opening && ctx.deadline_passed(now_ms) {
        let next = if reads.open_fitted() {
            Position::Unknown
        } else {
            Position::Open
        };
        return Some(Transition {
            next,
            cause: TransitionCause::OpenTimeout,
        });
    }

    if closing && reads.close_active() {
        return Some(Transition {
            next: Position::Closed,
            cause: TransitionCause::CloseSwitch,
        });
    }

    if closing && ctx.deadline_passed(now_ms) {
        let next = if reads.close_fitted() {
            Position::Unknown
        } else {
            Position::Closed
        };
        return Some(Transition {
            next,
            cause: TransitionCause::CloseTimeout,
        });
    }

    None
}
