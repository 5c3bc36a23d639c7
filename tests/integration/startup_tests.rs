//! Startup: pin setup, position sampling and the drive to the desired
//! start position.

use shadectl::app::ports::{PendingCounter, PinMode};
use shadectl::fsm::{Endpoint, Position};
use shadectl::pins;
use shadectl::scheduler::PendingTimers;

use crate::mock_hw::{MockBoard, MockEeprom};
use crate::{board_at_closed, board_at_open, den_config, den_without_switches, started, started_on};

#[test]
fn pins_are_configured() {
    let timers = PendingTimers::new();
    let shade = started(den_config(), &timers);
    let board = shade.hardware();
    assert_eq!(board.mode(pins::OPEN_SWITCH_GPIO), Some(PinMode::InputPullUp));
    assert_eq!(board.mode(pins::CLOSE_SWITCH_GPIO), Some(PinMode::InputPullUp));
    assert_eq!(board.mode(pins::MOTOR_OPEN_GPIO), Some(PinMode::Output));
    assert_eq!(board.mode(pins::MOTOR_CLOSE_GPIO), Some(PinMode::Output));
    assert_eq!(board.duty(pins::MOTOR_PWM_GPIO), Some(0));
}

#[test]
fn floating_inputs_without_pull_up() {
    let timers = PendingTimers::new();
    let mut config = den_config();
    config.switch_pull_up = false;
    let shade = started(config, &timers);
    assert_eq!(shade.hardware().mode(pins::OPEN_SWITCH_GPIO), Some(PinMode::Input));
}

#[test]
fn reports_timeouts_then_sampled_position() {
    let timers = PendingTimers::new();
    let shade = started_on(den_config(), board_at_open(), MockEeprom::erased(), &timers);
    assert_eq!(shade.position(), Position::Open);
    assert_eq!(
        shade.sink().lines,
        ["den opentimeout:60", "den closetimeout:60", "den open"]
    );
    assert_eq!(timers.pending(), 0);
}

#[test]
fn close_switch_wins_when_both_active() {
    let timers = PendingTimers::new();
    let mut board = MockBoard::new();
    board.trip(pins::OPEN_SWITCH_GPIO);
    board.trip(pins::CLOSE_SWITCH_GPIO);
    let shade = started_on(den_config(), board, MockEeprom::erased(), &timers);
    assert_eq!(shade.position(), Position::Closed);
}

#[test]
fn no_switches_starts_unknown() {
    let timers = PendingTimers::new();
    let shade = started(den_without_switches(), &timers);
    assert_eq!(shade.position(), Position::Unknown);
    assert_eq!(shade.sink().last(), Some("den unknown"));
}

#[test]
fn active_high_switches() {
    let timers = PendingTimers::new();
    let mut config = den_config();
    config.switch_active_high = true;
    config.switch_pull_up = false;
    // Unset inputs read HIGH on the mock, so both switches look tripped.
    let shade = started(config, &timers);
    assert_eq!(shade.position(), Position::Closed);
}

#[test]
fn drives_towards_desired_start() {
    let timers = PendingTimers::new();
    let mut config = den_config();
    config.desired_start = Some(Endpoint::Closed);
    let shade = started_on(config, board_at_open(), MockEeprom::erased(), &timers);

    assert_eq!(shade.position(), Position::Closing);
    assert!(shade.timer_pending());
    assert_eq!(timers.pending(), 1);
    assert_eq!(
        shade.sink().lines,
        ["den opentimeout:60", "den closetimeout:60", "den closing"]
    );
}

#[test]
fn desired_start_from_unknown() {
    let timers = PendingTimers::new();
    let mut config = den_without_switches();
    config.desired_start = Some(Endpoint::Open);
    let mut shade = started(config, &timers);
    assert_eq!(shade.position(), Position::Opening);
    assert!(shade.poll(60_001).is_some());
    assert_eq!(shade.position(), Position::Open);
}

#[test]
fn desired_start_already_reached_just_reports() {
    let timers = PendingTimers::new();
    let mut config = den_config();
    config.desired_start = Some(Endpoint::Closed);
    let shade = started_on(config, board_at_closed(), MockEeprom::erased(), &timers);

    assert_eq!(shade.position(), Position::Closed);
    assert!(!shade.timer_pending());
    assert_eq!(shade.sink().last(), Some("den closed"));
}
