//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod mock_hw;
mod startup_tests;
mod travel_tests;

use mock_hw::{MockBoard, MockEeprom, RecordingSink};
use shadectl::app::service::ShadeController;
use shadectl::config::ShadeConfig;
use shadectl::pins;
use shadectl::scheduler::PendingTimers;

pub type TestShade<'a> = ShadeController<MockBoard, MockEeprom, RecordingSink, &'a PendingTimers>;

/// Config named "den" with both switches fitted on the default pins.
pub fn den_config() -> ShadeConfig {
    ShadeConfig::named("den").unwrap()
}

/// Same wiring with no limit switches at all.
pub fn den_without_switches() -> ShadeConfig {
    let mut c = den_config();
    c.open_switch_pin = None;
    c.close_switch_pin = None;
    c
}

/// Build and start a controller on a fresh board and erased storage.
pub fn started(config: ShadeConfig, timers: &PendingTimers) -> TestShade<'_> {
    started_on(config, MockBoard::new(), MockEeprom::erased(), timers)
}

pub fn started_on(
    config: ShadeConfig,
    board: MockBoard,
    storage: MockEeprom,
    timers: &PendingTimers,
) -> TestShade<'_> {
    let mut shade = ShadeController::new(config, board, storage, RecordingSink::default(), timers);
    shade.start();
    shade
}

/// Board with the close switch tripped, so the shade starts Closed.
pub fn board_at_closed() -> MockBoard {
    let mut b = MockBoard::new();
    b.trip(pins::CLOSE_SWITCH_GPIO);
    b
}

/// Board with the open switch tripped, so the shade starts Open.
pub fn board_at_open() -> MockBoard {
    let mut b = MockBoard::new();
    b.trip(pins::OPEN_SWITCH_GPIO);
    b
}
