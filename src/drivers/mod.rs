//! Actuator drivers, hardware initialisation, and the actuator bank.
//!
//! Every actuator implements [`Actuator`]: given the tick's intent flag it
//! either runs its action or drives its output idle.  Timed actions (the
//! servo sweep, the melody) are precomputed as [`SignalStep`] profiles and
//! executed by [`play_profile`], which blocks through each step's hold time.

pub mod flow;
pub mod hw_init;
pub mod ledc;
pub mod rotary;
pub mod tone;

use core::fmt;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::{SignalPort, SwitchPort};
use crate::app::state::DeviceState;
use crate::error::ActuatorError;

use flow::FlowDriver;
use rotary::RotaryDriver;
use tone::ToneDriver;

// ── Actuator identity ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorKind {
    Rotary,
    Tone,
    Flow,
}

impl ActuatorKind {
    /// Fixed drive order within a tick.
    pub const DRIVE_ORDER: [ActuatorKind; 3] =
        [ActuatorKind::Rotary, ActuatorKind::Tone, ActuatorKind::Flow];
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rotary => "motor",
            Self::Tone => "speaker",
            Self::Flow => "water",
        })
    }
}

/// Uniform capability shared by the three actuator drivers.
pub trait Actuator {
    fn kind(&self) -> ActuatorKind;

    /// Act on this tick's intent.  Blocking: a sweep or melody runs to
    /// completion before this returns.
    fn apply(&mut self, intent: bool, delay: &mut impl DelayNs) -> Result<(), ActuatorError>;

    /// Force the output idle and release it.  Never fails; problems are logged.
    fn shutdown(&mut self);
}

// ── Signal profiles ───────────────────────────────────────────

/// One PWM setting held for a fixed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStep {
    /// Retune the carrier before setting the duty (`None` keeps it).
    pub frequency_hz: Option<u32>,
    pub duty_percent: f32,
    pub hold: Duration,
}

/// Execute a profile: per step, optional frequency write, duty write, hold.
/// Stops at the first failed write.  Returns the number of steps played.
pub fn play_profile<S: SignalPort>(
    signal: &mut S,
    delay: &mut impl DelayNs,
    steps: impl IntoIterator<Item = SignalStep>,
) -> Result<usize, ActuatorError> {
    let mut played = 0;
    for step in steps {
        if let Some(hz) = step.frequency_hz {
            signal.set_frequency(hz)?;
        }
        signal.set_duty(step.duty_percent)?;
        delay.delay_us(u32::try_from(step.hold.as_micros()).unwrap_or(u32::MAX));
        played += 1;
    }
    Ok(played)
}

// ── Actuator bank ─────────────────────────────────────────────

/// Faults collected while driving one tick (at most one per actuator).
pub type DriveFaults = heapless::Vec<(ActuatorKind, ActuatorError), 3>;

/// What the controller needs from the set of actuators.
pub trait ActuatorSet {
    /// Drive every actuator from `state`, in [`ActuatorKind::DRIVE_ORDER`].
    /// A failing actuator does not stop the ones after it.
    fn drive(&mut self, state: &DeviceState, delay: &mut impl DelayNs) -> DriveFaults;

    /// Stop every output and release the signal generators.  Idempotent.
    fn all_off(&mut self);
}

/// Owns the three drivers.  Outputs are released on [`ActuatorSet::all_off`]
/// or, failing that, when the bank is dropped — including during unwinding.
pub struct ActuatorBank<R: SignalPort, T: SignalPort, F: SwitchPort> {
    rotary: RotaryDriver<R>,
    tone: ToneDriver<T>,
    flow: FlowDriver<F>,
    released: bool,
}

impl<R: SignalPort, T: SignalPort, F: SwitchPort> ActuatorBank<R, T, F> {
    pub fn new(rotary: RotaryDriver<R>, tone: ToneDriver<T>, flow: FlowDriver<F>) -> Self {
        Self {
            rotary,
            tone,
            flow,
            released: false,
        }
    }

    pub fn rotary(&self) -> &RotaryDriver<R> {
        &self.rotary
    }

    pub fn tone(&self) -> &ToneDriver<T> {
        &self.tone
    }

    pub fn flow(&self) -> &FlowDriver<F> {
        &self.flow
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<R: SignalPort, T: SignalPort, F: SwitchPort> ActuatorSet for ActuatorBank<R, T, F> {
    fn drive(&mut self, state: &DeviceState, delay: &mut impl DelayNs) -> DriveFaults {
        let mut faults = DriveFaults::new();
        for kind in ActuatorKind::DRIVE_ORDER {
            let intent = state.intent(kind);
            let result = match kind {
                ActuatorKind::Rotary => self.rotary.apply(intent, delay),
                ActuatorKind::Tone => self.tone.apply(intent, delay),
                ActuatorKind::Flow => self.flow.apply(intent, delay),
            };
            if let Err(e) = result {
                // Capacity equals the number of actuators.
                let _ = faults.push((kind, e));
            }
        }
        faults
    }

    fn all_off(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.rotary.shutdown();
        self.tone.shutdown();
        self.flow.shutdown();
    }
}

impl<R: SignalPort, T: SignalPort, F: SwitchPort> Drop for ActuatorBank<R, T, F> {
    fn drop(&mut self) {
        if !self.released {
            warn!("Actuator bank dropped without shutdown, releasing outputs");
            self.all_off();
        }
    }
}
