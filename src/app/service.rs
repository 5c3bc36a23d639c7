//! Shade controller: the hexagonal core.
//!
//! [`ShadeController`] owns the travel state, the motor and switch drivers
//! and the timeout store.  All I/O flows through port traits supplied at
//! construction, so the whole controller runs against mock adapters on
//! the host.
//!
//! ```text
//!   DigitalIoPort ◀──┐                       ┌──▶ StatusSink
//!       ClockPort ───┤  ┌─────────────────┐  │
//!                    ├──│ ShadeController │──┤
//!     StoragePort ◀──┘  │ travel · guards │  └──▶ PendingCounter
//!                       └─────────────────┘
//! ```
//!
//! The scheduler calls [`start`] once, then [`poll`] (or [`tick`]) at its
//! own cadence, and [`handle_command`] / [`refresh`] whenever the hub asks.
//!
//! [`start`]: ShadeController::start
//! [`poll`]: ShadeController::poll
//! [`tick`]: ShadeController::tick
//! [`handle_command`]: ShadeController::handle_command
//! [`refresh`]: ShadeController::refresh

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::config::ShadeConfig;
use crate::drivers::motor::{Direction, MotorDriver};
use crate::drivers::switch::{SignalPolarity, SwitchReader};
use crate::fsm::{Endpoint, Position};
use crate::fsm::context::{SwitchReads, TravelContext};
use crate::fsm::states::{self, Transition};
use crate::timeouts::{TimeoutRecord, TimeoutStore};

use super::commands::{MotorCommand, ShadeRequest};
use super::events::StatusReport;
use super::ports::{ClockPort, DigitalIoPort, PendingCounter, StatusSink, StoragePort};

/// Longest status line: 24-byte name, a space, `closetimeout:4294967295`.
const STATUS_LINE_CAPACITY: usize = 64;

// ───────────────────────────────────────────────────────────────
// ShadeController
// ───────────────────────────────────────────────────────────────

pub struct ShadeController<H, S, N, C> {
    config: ShadeConfig,
    hw: H,
    storage: S,
    sink: N,
    counter: C,
    motor: MotorDriver,
    open_switch: SwitchReader,
    close_switch: SwitchReader,
    store: TimeoutStore,
    ctx: TravelContext,
}

impl<H, S, N, C> ShadeController<H, S, N, C>
where
    H: DigitalIoPort + ClockPort,
    S: StoragePort,
    N: StatusSink,
    C: PendingCounter,
{
    /// Build a controller.  Touches no hardware; call [`start`] next.
    ///
    /// [`start`]: Self::start
    pub fn new(config: ShadeConfig, hw: H, storage: S, sink: N, counter: C) -> Self {
        let polarity = SignalPolarity::new(config.switch_active_high, config.switch_pull_up);
        let motor = MotorDriver::new(
            config.motor_open_pin,
            config.motor_close_pin,
            config.motor_pwm_pin,
            config.pwm_duty,
            config.invert_output,
        );
        Self {
            open_switch: SwitchReader::new(config.open_switch_pin, polarity),
            close_switch: SwitchReader::new(config.close_switch_pin, polarity),
            store: TimeoutStore::new(config.storage_offset),
            ctx: TravelContext::new(config.default_timeouts()),
            motor,
            config,
            hw,
            storage,
            sink,
            counter,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Configure pins, work out where the shade is, load the timeouts and
    /// head for the desired start position if it differs.
    pub fn start(&mut self) {
        self.open_switch.configure(&mut self.hw);
        self.close_switch.configure(&mut self.hw);
        self.motor.configure(&mut self.hw);
        self.motor.stop(&mut self.hw);

        // Close is sampled first and wins if both switches read active.
        self.ctx.position = if self.close_switch.is_active(&self.hw) {
            Position::Closed
        } else if self.open_switch.is_active(&self.hw) {
            Position::Open
        } else {
            Position::Unknown
        };

        self.ctx.timeouts = self
            .store
            .load(&mut self.storage, self.config.default_timeouts());
        self.report(StatusReport::OpenTimeout(self.ctx.timeouts.open_secs));
        self.report(StatusReport::CloseTimeout(self.ctx.timeouts.close_secs));

        info!(
            "{}: started at {} (open {}s, close {}s)",
            self.config.name,
            self.ctx.position,
            self.ctx.timeouts.open_secs,
            self.ctx.timeouts.close_secs
        );

        match self.config.desired_start {
            Some(target) if Position::from(target) != self.ctx.position => {
                info!("{}: driving to start position {:?}", self.config.name, target);
                self.issue_command(match target {
                    Endpoint::Open => MotorCommand::Open,
                    Endpoint::Closed => MotorCommand::Close,
                });
            }
            _ => self.report(StatusReport::Position(self.ctx.position)),
        }
    }

    // ── Motor commands ────────────────────────────────────────

    /// Execute a motor command unconditionally.
    pub fn issue_command(&mut self, cmd: MotorCommand) {
        match cmd {
            MotorCommand::Open => {
                self.motor.drive(&mut self.hw, Direction::Open);
                self.ctx.deadline_ms = self.hw.now_ms().wrapping_add(self.ctx.timeouts.open_ms());
                if !self.ctx.timer_pending {
                    self.counter.increment();
                    self.ctx.timer_pending = true;
                }
                self.ctx.position = Position::Opening;
                self.report(StatusReport::Position(Position::Opening));
            }
            MotorCommand::Close => {
                self.motor.drive(&mut self.hw, Direction::Close);
                self.ctx.deadline_ms = self.hw.now_ms().wrapping_add(self.ctx.timeouts.close_ms());
                // Counted on every close, even when a timer is already
                // running.  Open does not do this.
                self.counter.increment();
                self.ctx.timer_pending = true;
                self.ctx.position = Position::Closing;
                self.report(StatusReport::Position(Position::Closing));
            }
            MotorCommand::Stop => {
                self.motor.stop(&mut self.hw);
                if self.ctx.timer_pending {
                    self.counter.decrement();
                    self.ctx.timer_pending = false;
                }
            }
        }
        info!(
            "{}: {:?} -> {} (pending {})",
            self.config.name,
            cmd,
            self.ctx.position,
            self.counter.pending()
        );
    }

    /// Execute a raw command code.  Unknown codes are logged and dropped.
    pub fn issue_raw_command(&mut self, code: u8) {
        match MotorCommand::try_from(code) {
            Ok(cmd) => self.issue_command(cmd),
            Err(code) => warn!("{}: unsupported motor command {}", self.config.name, code),
        }
    }

    // ── Polling ───────────────────────────────────────────────

    /// Check switches and the travel deadline.  Stops the motor and
    /// settles the position when a travel ends.
    pub fn poll(&mut self, now_ms: u32) -> Option<Transition> {
        if !self.ctx.position.is_travelling() {
            return None;
        }

        let reads = SwitchReads {
            open: self.open_switch.sample(&self.hw),
            close: self.close_switch.sample(&self.hw),
        };
        let transition = states::evaluate(&self.ctx, now_ms, reads)?;

        info!(
            "{}: {} -> {} ({:?})",
            self.config.name, self.ctx.position, transition.next, transition.cause
        );
        self.issue_command(MotorCommand::Stop);
        self.ctx.position = transition.next;
        self.report(StatusReport::Position(transition.next));
        Some(transition)
    }

    /// [`poll`](Self::poll) against the hardware clock.
    pub fn tick(&mut self) -> Option<Transition> {
        let now = self.hw.now_ms();
        self.poll(now)
    }

    // ── Hub interface ─────────────────────────────────────────

    /// Interpret one command line from the hub.
    pub fn handle_command(&mut self, line: &str) {
        match ShadeRequest::parse(line) {
            ShadeRequest::Open => {
                if self.may_open() {
                    self.issue_command(MotorCommand::Open);
                } else {
                    debug!("{}: open refused at {}", self.config.name, self.ctx.position);
                }
            }
            ShadeRequest::Close => {
                if self.may_close() {
                    self.issue_command(MotorCommand::Close);
                    self.report(StatusReport::Position(Position::Closing));
                } else {
                    debug!("{}: close refused at {}", self.config.name, self.ctx.position);
                }
            }
            ShadeRequest::Stop => self.issue_command(MotorCommand::Stop),
            ShadeRequest::SetOpenTimeout(secs) => {
                self.ctx.timeouts.open_secs = secs;
                self.persist_timeouts();
                self.report(StatusReport::OpenTimeout(secs));
            }
            ShadeRequest::SetCloseTimeout(secs) => {
                self.ctx.timeouts.close_secs = secs;
                self.persist_timeouts();
                self.report(StatusReport::CloseTimeout(secs));
            }
            ShadeRequest::PersistTimeouts => self.persist_timeouts(),
            ShadeRequest::Ignored => debug!("{}: ignored {:?}", self.config.name, line),
        }
    }

    /// Re-send position and both timeouts.
    pub fn refresh(&mut self) {
        self.report(StatusReport::Position(self.ctx.position));
        self.report(StatusReport::OpenTimeout(self.ctx.timeouts.open_secs));
        self.report(StatusReport::CloseTimeout(self.ctx.timeouts.close_secs));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn position(&self) -> Position {
        self.ctx.position
    }

    pub fn timer_pending(&self) -> bool {
        self.ctx.timer_pending
    }

    pub fn deadline_ms(&self) -> u32 {
        self.ctx.deadline_ms
    }

    /// Effective timeouts (may differ from the configured defaults).
    pub fn timeouts(&self) -> TimeoutRecord {
        self.ctx.timeouts
    }

    pub fn config(&self) -> &ShadeConfig {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    // ── Internal ──────────────────────────────────────────────

    fn may_open(&self) -> bool {
        (self.ctx.position == Position::Closed && !self.ctx.timer_pending)
            || self.open_switch.sample(&self.hw) == Some(false)
    }

    fn may_close(&self) -> bool {
        (self.ctx.position == Position::Open && !self.ctx.timer_pending)
            || self.close_switch.sample(&self.hw) == Some(false)
    }

    fn persist_timeouts(&mut self) {
        if let Err(e) = self.store.save(&mut self.storage, self.ctx.timeouts) {
            warn!("{}: could not persist timeouts: {}", self.config.name, e);
        }
    }

    fn report(&mut self, report: StatusReport) {
        let mut line: heapless::String<STATUS_LINE_CAPACITY> = heapless::String::new();
        if write!(line, "{} {}", self.config.name, report).is_err() {
            warn!("{}: status line overflow for {:?}", self.config.name, report);
            return;
        }
        self.sink.send_status(&line);
    }
}
