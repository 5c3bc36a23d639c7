//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                  |
//! |------------|-----------------|------------------------------|
//! | `hardware` | DigitalIoPort   | ESP32 GPIO, LEDC PWM         |
//! |            | ClockPort       | (via `time`)                 |
//! | `eeprom`   | StoragePort     | RAM mirror of an NVS blob    |
//! | `log_sink` | StatusSink      | Serial log output            |
//! | `time`     | ClockPort       | ESP32 system timer           |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod time;
