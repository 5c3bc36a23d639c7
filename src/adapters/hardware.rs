//! Board I/O adapter: bridges GPIO and LEDC to [`DigitalIoPort`] and
//! [`ClockPort`].
//!
//! This is the only module that touches pin registers.  The motor PWM pin
//! is bound to LEDC channel 0 at construction; every other pin is plain
//! GPIO.  On non-espidf targets the pins are simulated in memory and
//! inputs can be driven from tests or a desktop harness.

use embedded_hal::digital::PinState;
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ClockPort, DigitalIoPort, PinMode};
use crate::pins::{self, PinId};

#[cfg(target_os = "espidf")]
const PWM_CHANNEL: u32 = 0;

pub struct BoardIo {
    clock: MonotonicClock,
    pwm_pin: PinId,
    #[cfg(not(target_os = "espidf"))]
    sim: SimPins,
}

/// In-memory pin state for host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimPins {
    modes: HashMap<PinId, PinMode>,
    levels: HashMap<PinId, PinState>,
    duty: u16,
}

impl BoardIo {
    /// Bind the PWM peripheral to `pwm_pin`.
    pub fn new(pwm_pin: PinId) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from main() before the poll loop starts.
            unsafe { init_pwm(pwm_pin) };
        }

        #[cfg(not(target_os = "espidf"))]
        info!(
            "BoardIo(sim): PWM on GPIO{} ({} Hz)",
            pwm_pin,
            pins::MOTOR_PWM_FREQ_HZ
        );

        Self {
            clock: MonotonicClock::new(),
            pwm_pin,
            #[cfg(not(target_os = "espidf"))]
            sim: SimPins::default(),
        }
    }

    pub fn clock(&self) -> &MonotonicClock {
        &self.clock
    }

    /// Drive a simulated input (e.g. close a limit switch).
    #[cfg(not(target_os = "espidf"))]
    pub fn set_input(&mut self, pin: PinId, level: PinState) {
        self.sim.levels.insert(pin, level);
    }

    /// Last level written to a simulated output.
    #[cfg(not(target_os = "espidf"))]
    pub fn output_level(&self, pin: PinId) -> Option<PinState> {
        match self.sim.modes.get(&pin) {
            Some(PinMode::Output) => self.sim.levels.get(&pin).copied(),
            _ => None,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn pwm_duty(&self) -> u16 {
        self.sim.duty
    }
}

// ── DigitalIoPort ─────────────────────────────────────────────

impl DigitalIoPort for BoardIo {
    #[cfg(target_os = "espidf")]
    fn configure_pin(&mut self, pin: PinId, mode: PinMode) {
        if pin == self.pwm_pin {
            return;
        }
        let (gpio_mode, pull_up) = match mode {
            PinMode::Input => (gpio_mode_t_GPIO_MODE_INPUT, gpio_pullup_t_GPIO_PULLUP_DISABLE),
            PinMode::InputPullUp => (gpio_mode_t_GPIO_MODE_INPUT, gpio_pullup_t_GPIO_PULLUP_ENABLE),
            PinMode::Output => (gpio_mode_t_GPIO_MODE_OUTPUT, gpio_pullup_t_GPIO_PULLUP_DISABLE),
        };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode,
            pull_up_en: pull_up,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: plain register configuration from the main task.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            warn!("BoardIo: gpio_config GPIO{} failed (rc={})", pin, ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn configure_pin(&mut self, pin: PinId, mode: PinMode) {
        if pin == self.pwm_pin {
            return;
        }
        self.sim.modes.insert(pin, mode);
        match mode {
            PinMode::InputPullUp => {
                self.sim.levels.entry(pin).or_insert(PinState::High);
            }
            PinMode::Input => {
                self.sim.levels.entry(pin).or_insert(PinState::Low);
            }
            PinMode::Output => {
                self.sim.levels.insert(pin, PinState::Low);
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn write_output(&mut self, pin: PinId, level: PinState) {
        // SAFETY: pin configured as output in configure_pin().
        unsafe {
            gpio_set_level(i32::from(pin), u32::from(level == PinState::High));
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_output(&mut self, pin: PinId, level: PinState) {
        self.sim.levels.insert(pin, level);
    }

    #[cfg(target_os = "espidf")]
    fn read_input(&self, pin: PinId) -> PinState {
        // SAFETY: read-only register access.
        PinState::from((unsafe { gpio_get_level(i32::from(pin)) }) != 0)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_input(&self, pin: PinId) -> PinState {
        self.sim.levels.get(&pin).copied().unwrap_or(PinState::Low)
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) {
        if pin != self.pwm_pin {
            warn!("BoardIo: GPIO{} has no PWM channel", pin);
            return;
        }

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: channel configured in init_pwm(); main-task only.
            unsafe {
                ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, PWM_CHANNEL, u32::from(duty));
                ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, PWM_CHANNEL);
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.sim.duty = duty;
        }
    }
}

impl ClockPort for BoardIo {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

#[cfg(target_os = "espidf")]
unsafe fn init_pwm(pwm_pin: PinId) {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::PWM_RESOLUTION_BITS,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer);
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: PWM_CHANNEL,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: i32::from(pwm_pin),
            duty: 0,
            hpoint: 0,
            ..Default::default()
        });
    }
    info!(
        "BoardIo: LEDC CH0 on GPIO{} ({} Hz, {}-bit)",
        pwm_pin,
        pins::MOTOR_PWM_FREQ_HZ,
        pins::PWM_RESOLUTION_BITS
    );
}
