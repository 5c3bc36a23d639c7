//! Fuzz target: `ShadeController::handle_command`
//!
//! Feeds arbitrary command lines into a running controller (simulated
//! board, RAM storage) and checks that the pending flag and the shared
//! counter stay consistent and that polling never panics.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use shadectl::adapters::eeprom::EepromAdapter;
use shadectl::adapters::hardware::BoardIo;
use shadectl::adapters::log_sink::LogStatusSink;
use shadectl::app::ports::PendingCounter;
use shadectl::app::service::ShadeController;
use shadectl::config::ShadeConfig;
use shadectl::scheduler::PendingTimers;

fuzz_target!(|data: &[u8]| {
    let config = ShadeConfig::default();
    let timers = PendingTimers::new();
    let hw = BoardIo::new(config.motor_pwm_pin);
    let mut shade =
        ShadeController::new(config, hw, EepromAdapter::erased(), LogStatusSink::new(), &timers);
    shade.start();

    let text = String::from_utf8_lossy(data);
    for (i, line) in text.lines().enumerate() {
        shade.handle_command(line);
        let _ = shade.poll((i as u32).wrapping_mul(7_919));
        assert!(timers.pending() >= u32::from(shade.timer_pending()));
        assert!(!shade.timer_pending() || shade.position().is_travelling());
    }
});
