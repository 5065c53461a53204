//! Piezo buzzer driver (tone actuator).
//!
//! While the speaker intent is set, every tick plays the melody once: each
//! step retunes the PWM carrier and holds 50 % duty for the step duration,
//! then the output goes silent.  With the intent cleared the buzzer is
//! forced silent straight away; unlike the servo there is nothing to wind
//! down.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::SignalPort;
use crate::drivers::{Actuator, ActuatorKind, SignalStep, play_profile};
use crate::error::ActuatorError;

/// Square wave: loudest output for a piezo.
pub const TONE_DUTY_PERCENT: f32 = 50.0;

pub const MAX_MELODY_STEPS: usize = 16;

/// One note of the melody.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MelodyStep {
    pub frequency_hz: u32,
    pub duration_secs: f32,
}

pub type Melody = heapless::Vec<MelodyStep, MAX_MELODY_STEPS>;

/// The notes as signal steps (without the trailing silence).
pub fn melody_profile(melody: &[MelodyStep]) -> impl Iterator<Item = SignalStep> + '_ {
    melody.iter().map(|note| SignalStep {
        frequency_hz: Some(note.frequency_hz),
        duty_percent: TONE_DUTY_PERCENT,
        hold: Duration::try_from_secs_f32(note.duration_secs).unwrap_or(Duration::ZERO),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneState {
    Silent,
    Playing,
}

pub struct ToneDriver<S> {
    signal: S,
    melody: Melody,
    state: ToneState,
}

impl<S: SignalPort> ToneDriver<S> {
    pub fn new(signal: S, melody: Melody) -> Self {
        Self {
            signal,
            melody,
            state: ToneState::Silent,
        }
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn melody(&self) -> &[MelodyStep] {
        &self.melody
    }

    pub fn signal(&self) -> &S {
        &self.signal
    }
}

impl<S: SignalPort> Actuator for ToneDriver<S> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Tone
    }

    fn apply(&mut self, intent: bool, delay: &mut impl DelayNs) -> Result<(), ActuatorError> {
        if !intent {
            self.state = ToneState::Silent;
            debug!("Speaker is stopped");
            return self.signal.set_duty(0.0);
        }

        info!("Playing melody ({} notes)", self.melody.len());
        self.state = ToneState::Playing;
        let played = play_profile(&mut self.signal, delay, melody_profile(&self.melody));
        // Silence even when a note failed.
        let silenced = self.signal.set_duty(0.0);
        self.state = ToneState::Silent;
        played?;
        silenced
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.signal.set_duty(0.0) {
            warn!("Buzzer: could not silence on shutdown: {}", e);
        }
        self.signal.release();
        self.state = ToneState::Silent;
    }
}
