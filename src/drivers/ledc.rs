//! LEDC PWM channel as a [`SignalPort`].
//!
//! Converts percent duty into the channel's raw resolution and keeps the
//! last written values so the drivers (and the log) can report them.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC registers via hw_init helpers.
//! On host/test: tracks state in-memory only.

use log::warn;

use crate::app::ports::SignalPort;
use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

pub struct LedcChannel {
    channel: u32,
    timer: u32,
    max_duty: u32,
    duty_percent: f32,
    frequency_hz: u32,
    released: bool,
}

impl LedcChannel {
    pub fn new(channel: u32, timer: u32, resolution_bits: u32, frequency_hz: u32) -> Self {
        Self {
            channel,
            timer,
            max_duty: (1u32 << resolution_bits) - 1,
            duty_percent: 0.0,
            frequency_hz,
            released: false,
        }
    }

    /// Servo output on CH0 / timer 0.
    pub fn servo() -> Self {
        Self::new(
            hw_init::LEDC_CH_SERVO,
            hw_init::LEDC_TIMER_SERVO,
            pins::SERVO_PWM_RESOLUTION_BITS,
            pins::SERVO_PWM_FREQ_HZ,
        )
    }

    /// Buzzer output on CH1 / timer 1.
    pub fn buzzer() -> Self {
        Self::new(
            hw_init::LEDC_CH_BUZZER,
            hw_init::LEDC_TIMER_BUZZER,
            pins::BUZZER_PWM_RESOLUTION_BITS,
            pins::BUZZER_BASE_FREQ_HZ,
        )
    }

    /// Raw register value for a duty percentage (clamped to 0–100).
    pub fn duty_raw(&self, percent: f32) -> u32 {
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        (fraction * self.max_duty as f32).round() as u32
    }

    pub fn duty_percent(&self) -> f32 {
        self.duty_percent
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl SignalPort for LedcChannel {
    fn set_duty(&mut self, percent: f32) -> Result<(), ActuatorError> {
        if self.released {
            return Err(ActuatorError::SignalReleased);
        }
        hw_init::ledc_set(self.channel, self.duty_raw(percent)).map_err(|rc| {
            warn!("LEDC CH{} duty write failed (rc={})", self.channel, rc);
            ActuatorError::PwmWriteFailed
        })?;
        self.duty_percent = percent.clamp(0.0, 100.0);
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), ActuatorError> {
        if self.released {
            return Err(ActuatorError::SignalReleased);
        }
        if hz == self.frequency_hz {
            return Ok(());
        }
        hw_init::ledc_set_frequency(self.timer, hz).map_err(|rc| {
            warn!("LEDC timer {} rejected {} Hz (rc={})", self.timer, hz, rc);
            ActuatorError::FrequencyRejected(hz)
        })?;
        self.frequency_hz = hz;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        hw_init::ledc_release(self.channel);
        self.duty_percent = 0.0;
        self.released = true;
    }
}
