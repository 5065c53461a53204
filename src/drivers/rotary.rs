//! Hobby-servo driver (rotary actuator).
//!
//! While the motor intent is set, every tick performs one full sweep:
//! 0° → 180° in 10° steps, then back to 0°, holding each angle for 50 ms.
//! The sweep blocks the tick and cannot be cancelled part-way; a stop
//! command only takes effect on the next tick's intent check.
//!
//! Angles map to duty with `duty = 2 + angle / 180 * 10` (2 % – 12 % of a
//! 20 ms frame at 50 Hz).

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::ports::SignalPort;
use crate::drivers::{Actuator, ActuatorKind, SignalStep, play_profile};
use crate::error::ActuatorError;

pub const SWEEP_STEP_DEG: u32 = 10;
pub const MAX_ANGLE_DEG: u32 = 180;
pub const SWEEP_DWELL: Duration = Duration::from_millis(50);
pub const MIN_DUTY_PERCENT: f32 = 2.0;
pub const DUTY_SPAN_PERCENT: f32 = 10.0;

/// Affine angle → duty map for a 2–12 % servo.
pub fn angle_to_duty(angle_deg: u32) -> f32 {
    MIN_DUTY_PERCENT + (angle_deg as f32 / MAX_ANGLE_DEG as f32) * DUTY_SPAN_PERCENT
}

/// The full out-and-back sweep: 19 steps up, 19 steps down.
pub fn sweep_profile() -> impl Iterator<Item = SignalStep> {
    let steps = MAX_ANGLE_DEG / SWEEP_STEP_DEG;
    let up = (0..=steps).map(|i| i * SWEEP_STEP_DEG);
    let down = (0..=steps).rev().map(|i| i * SWEEP_STEP_DEG);
    up.chain(down).map(|angle| SignalStep {
        frequency_hz: None,
        duty_percent: angle_to_duty(angle),
        hold: SWEEP_DWELL,
    })
}

/// `Sweeping` while the motor intent is set, including between sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotaryState {
    Idle,
    Sweeping,
}

pub struct RotaryDriver<S> {
    signal: S,
    state: RotaryState,
    sweeps: u32,
}

impl<S: SignalPort> RotaryDriver<S> {
    pub fn new(signal: S) -> Self {
        Self {
            signal,
            state: RotaryState::Idle,
            sweeps: 0,
        }
    }

    pub fn state(&self) -> RotaryState {
        self.state
    }

    /// Completed sweeps since start.
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    pub fn signal(&self) -> &S {
        &self.signal
    }
}

impl<S: SignalPort> Actuator for RotaryDriver<S> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Rotary
    }

    fn apply(&mut self, intent: bool, delay: &mut impl DelayNs) -> Result<(), ActuatorError> {
        if !intent {
            self.state = RotaryState::Idle;
            debug!("Motor is stopped");
            return self.signal.set_duty(0.0);
        }

        info!("Activating motor: sweep 0-{}-0 deg", MAX_ANGLE_DEG);
        self.state = RotaryState::Sweeping;
        let steps = play_profile(&mut self.signal, delay, sweep_profile())?;
        self.sweeps += 1;
        debug!("Sweep complete ({} steps)", steps);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.signal.set_duty(0.0) {
            warn!("Servo: could not zero duty on shutdown: {}", e);
        }
        self.signal.release();
        self.state = RotaryState::Idle;
    }
}
