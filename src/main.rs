//! shadectl firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │   BoardIo            EepromAdapter     LogStatusSink     │
//! │   (DigitalIo+Clock)  (Storage)         (StatusSink)      │
//! │                                                          │
//! │   ─────────────── Port Trait Boundary ───────────────    │
//! │                                                          │
//! │   ┌──────────────────────────────────────────────────┐   │
//! │   │        ShadeController (pure logic)              │   │
//! │   │  travel rules · command guards · timeouts        │   │
//! │   └──────────────────────────────────────────────────┘   │
//! │                                                          │
//! │   PendingTimers (scheduler-owned) · console reader       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Command lines arrive on the console (`"<name> <verb>[:<value>]"`), one
//! per line, and are handed to the controller from the poll loop.
#![deny(unused_must_use)]

use std::io::BufRead;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info, warn};

use shadectl::adapters::eeprom::EepromAdapter;
use shadectl::adapters::hardware::BoardIo;
use shadectl::adapters::log_sink::LogStatusSink;
use shadectl::app::commands;
use shadectl::app::service::ShadeController;
use shadectl::config::ShadeConfig;
use shadectl::scheduler::PendingTimers;

/// Poll period while a shade is travelling.
const TRAVEL_POLL: Duration = Duration::from_millis(20);
/// Poll period while everything is at rest.
const IDLE_POLL: Duration = Duration::from_millis(200);
/// Unsolicited status refresh for the hub.
const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Optional board description baked in at build time.
const BOARD_JSON: Option<&str> = option_env!("SHADECTL_BOARD_JSON");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("shadectl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match BOARD_JSON {
        Some(json) => ShadeConfig::from_json(json)?,
        None => ShadeConfig::default(),
    };
    config.validate()?;
    info!("Config: {:?}", config);

    // ── 3. Adapters ───────────────────────────────────────────
    let storage = match EepromAdapter::open() {
        Ok(e) => e,
        Err(e) => {
            warn!("Storage init failed ({}), timeouts will not persist", e);
            EepromAdapter::erased()
        }
    };
    let hw = BoardIo::new(config.motor_pwm_pin);
    let timers = PendingTimers::new();

    // ── 4. Controller ─────────────────────────────────────────
    let mut shade = ShadeController::new(config, hw, storage, LogStatusSink::new(), &timers);
    shade.start();

    // ── 5. Console reader ─────────────────────────────────────
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("console".into())
        .stack_size(4096)
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { continue };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    info!("System ready. Entering poll loop.");

    // ── 6. Poll loop ──────────────────────────────────────────
    let mut last_refresh = Instant::now();
    loop {
        while let Ok(line) = rx.try_recv() {
            match commands::target(&line) {
                Some(name) if name == shade.config().name.as_str() => shade.handle_command(&line),
                _ => debug!("console: not for us: {:?}", line),
            }
        }

        shade.tick();

        if last_refresh.elapsed() >= REFRESH_INTERVAL {
            shade.refresh();
            last_refresh = Instant::now();
        }

        std::thread::sleep(if timers.any_pending() {
            TRAVEL_POLL
        } else {
            IDLE_POLL
        });
    }
}
