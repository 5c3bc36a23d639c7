//! Travel: motor commands, polling, switch/timer priority and the shared
//! pending-timer counter.

use embedded_hal::digital::PinState;
use shadectl::app::commands::MotorCommand;
use shadectl::app::ports::PendingCounter;
use shadectl::fsm::Position;
use shadectl::fsm::states::TransitionCause;
use shadectl::pins;
use shadectl::scheduler::PendingTimers;

use crate::{board_at_closed, board_at_open, den_config, den_without_switches, started, started_on};
use crate::mock_hw::MockEeprom;

// ── Scenario: no switches, open timeout 60 s ─────────────────

#[test]
fn open_without_switches_lands_on_timeout() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);

    shade.issue_command(MotorCommand::Open);
    assert_eq!(shade.position(), Position::Opening);
    assert_eq!(shade.sink().last(), Some("den opening"));
    assert_eq!(shade.hardware().duty(pins::MOTOR_PWM_GPIO), Some(shade.config().pwm_duty));

    assert!(shade.poll(59_000).is_none());
    assert_eq!(shade.position(), Position::Opening);

    let t = shade.poll(61_000).unwrap();
    assert_eq!(t.cause, TransitionCause::OpenTimeout);
    assert_eq!(shade.position(), Position::Open);
    assert_eq!(shade.sink().last(), Some("den open"));
    assert_eq!(shade.hardware().duty(pins::MOTOR_PWM_GPIO), Some(0));
    assert!(!shade.timer_pending());
    assert_eq!(timers.pending(), 0);
}

// ── Scenario: open switch ends the travel ─────────────────────

#[test]
fn open_switch_stops_travel() {
    let timers = PendingTimers::new();
    let mut shade = started_on(den_config(), board_at_closed(), MockEeprom::erased(), &timers);
    assert_eq!(shade.position(), Position::Closed);

    shade.handle_command("den open");
    assert_eq!(shade.position(), Position::Opening);

    let board = shade.hardware_mut();
    board.release(pins::CLOSE_SWITCH_GPIO);
    board.now = 5_000;
    assert!(shade.tick().is_none());

    shade.hardware_mut().trip(pins::OPEN_SWITCH_GPIO);
    let t = shade.poll(8_000).unwrap();
    assert_eq!(t.cause, TransitionCause::OpenSwitch);
    assert_eq!(shade.position(), Position::Open);
    assert_eq!(shade.hardware().duty(pins::MOTOR_PWM_GPIO), Some(0));
    assert_eq!(timers.pending(), 0);
}

// ── Scenario: close switch never fires, close timeout 30 s ────

#[test]
fn silent_close_switch_times_out_to_unknown() {
    let timers = PendingTimers::new();
    let mut config = den_config();
    config.default_close_timeout_secs = 30;
    let mut shade = started_on(config, board_at_open(), MockEeprom::erased(), &timers);

    shade.issue_command(MotorCommand::Close);
    shade.hardware_mut().release(pins::OPEN_SWITCH_GPIO);

    assert!(shade.poll(30_000).is_none());
    let t = shade.poll(31_000).unwrap();
    assert_eq!(t.cause, TransitionCause::CloseTimeout);
    assert_eq!(shade.position(), Position::Unknown);
    assert_eq!(shade.sink().last(), Some("den unknown"));
    assert_eq!(shade.hardware().duty(pins::MOTOR_PWM_GPIO), Some(0));
}

#[test]
fn switch_beats_expired_timer() {
    let timers = PendingTimers::new();
    let mut shade = started_on(den_config(), board_at_open(), MockEeprom::erased(), &timers);

    shade.issue_command(MotorCommand::Close);
    let board = shade.hardware_mut();
    board.release(pins::OPEN_SWITCH_GPIO);
    board.trip(pins::CLOSE_SWITCH_GPIO);

    let t = shade.poll(u32::MAX).unwrap();
    assert_eq!(t.cause, TransitionCause::CloseSwitch);
    assert_eq!(shade.position(), Position::Closed);
}

#[test]
fn second_poll_after_transition_does_nothing() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);
    shade.issue_command(MotorCommand::Close);

    assert!(shade.poll(70_000).is_some());
    let lines = shade.sink().lines.len();
    let calls = shade.hardware().calls.len();

    assert!(shade.poll(80_000).is_none());
    assert_eq!(shade.sink().lines.len(), lines);
    assert_eq!(shade.hardware().calls.len(), calls);
    assert_eq!(shade.position(), Position::Closed);
}

#[test]
fn resting_shade_ignores_switches() {
    let timers = PendingTimers::new();
    let mut shade = started_on(den_config(), board_at_closed(), MockEeprom::erased(), &timers);
    shade.hardware_mut().trip(pins::OPEN_SWITCH_GPIO);
    assert!(shade.poll(1_000_000).is_none());
    assert_eq!(shade.position(), Position::Closed);
}

// ── Motor outputs ─────────────────────────────────────────────

#[test]
fn inverted_outputs_flip_direction_levels() {
    let timers = PendingTimers::new();
    let mut config = den_without_switches();
    config.invert_output = true;
    let mut shade = started(config, &timers);

    shade.issue_command(MotorCommand::Open);
    let board = shade.hardware();
    assert_eq!(board.level(pins::MOTOR_OPEN_GPIO), Some(PinState::Low));
    assert_eq!(board.level(pins::MOTOR_CLOSE_GPIO), Some(PinState::High));

    shade.issue_command(MotorCommand::Stop);
    let board = shade.hardware();
    assert_eq!(board.level(pins::MOTOR_OPEN_GPIO), Some(PinState::High));
    assert_eq!(board.level(pins::MOTOR_CLOSE_GPIO), Some(PinState::High));
    assert_eq!(board.duty(pins::MOTOR_PWM_GPIO), Some(0));
}

#[test]
fn deadline_uses_clock_at_command_time() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);
    shade.hardware_mut().now = 10_000;
    shade.issue_command(MotorCommand::Open);
    assert_eq!(shade.deadline_ms(), 70_000);

    assert!(shade.poll(70_000).is_none());
    assert!(shade.poll(70_001).is_some());
}

#[test]
fn unsupported_raw_command_is_ignored() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);
    let lines = shade.sink().lines.len();
    let calls = shade.hardware().calls.len();

    shade.issue_raw_command(0);
    shade.issue_raw_command(42);
    assert_eq!(shade.sink().lines.len(), lines);
    assert_eq!(shade.hardware().calls.len(), calls);

    shade.issue_raw_command(1);
    assert_eq!(shade.position(), Position::Opening);
}

// ── Pending-timer counter ─────────────────────────────────────

#[test]
fn repeated_open_counts_once() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);
    shade.issue_command(MotorCommand::Open);
    shade.issue_command(MotorCommand::Open);
    assert_eq!(timers.pending(), 1);
    shade.issue_command(MotorCommand::Stop);
    assert_eq!(timers.pending(), 0);
}

#[test]
fn repeated_close_counts_every_time() {
    let timers = PendingTimers::new();
    let mut shade = started(den_without_switches(), &timers);
    shade.issue_command(MotorCommand::Close);
    shade.issue_command(MotorCommand::Close);
    assert_eq!(timers.pending(), 2);
    shade.issue_command(MotorCommand::Stop);
    assert_eq!(timers.pending(), 1);
}

#[test]
fn stop_without_pending_timer_leaves_counter_alone() {
    let timers = PendingTimers::new();
    let mut a = started(den_without_switches(), &timers);
    let mut b = started(den_without_switches(), &timers);

    b.issue_command(MotorCommand::Stop);
    assert_eq!(timers.pending(), 0);

    a.issue_command(MotorCommand::Open);
    b.issue_command(MotorCommand::Stop);
    b.issue_command(MotorCommand::Stop);
    assert_eq!(timers.pending(), 1);
    assert!(timers.any_pending());

    assert!(a.poll(61_000).is_some());
    assert_eq!(timers.pending(), 0);
}
