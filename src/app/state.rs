//! Device intent state.
//!
//! [`DeviceState`] is owned by the [`Controller`](super::service::Controller)
//! and rebuilt as all-`false` on every start; nothing here is persisted.

use crate::app::commands::Command;
use crate::drivers::ActuatorKind;

/// Desired actuator states plus the report cadence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub water_intent: bool,
    pub motor_intent: bool,
    pub speaker_intent: bool,
    /// Ticks since the last report, always `< report_period` between ticks.
    pub tick_counter: u32,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tick.  Returns `true` when the report period is reached,
    /// in which case the counter is already back at 0.
    pub fn advance_tick(&mut self, report_period: u32) -> bool {
        self.tick_counter += 1;
        if self.tick_counter >= report_period {
            self.tick_counter = 0;
            true
        } else {
            false
        }
    }

    /// Derive the water intent from a soil reading (dry ⇒ water).
    pub fn apply_reading(&mut self, soil_dry: bool) {
        self.water_intent = soil_dry;
    }

    /// Apply an operator command to exactly one intent flag.
    ///
    /// Returns the targeted actuator and the value written, or `None` for
    /// [`Command::Unknown`], which leaves every flag untouched.
    pub fn apply_command(&mut self, command: Command) -> Option<(ActuatorKind, bool)> {
        let (kind, on) = match command {
            Command::MoveMotor => (ActuatorKind::Rotary, true),
            Command::StopMotor => (ActuatorKind::Rotary, false),
            Command::PlaySound => (ActuatorKind::Tone, true),
            Command::StopSound => (ActuatorKind::Tone, false),
            Command::StartWater => (ActuatorKind::Flow, true),
            Command::StopWater => (ActuatorKind::Flow, false),
            Command::Unknown => return None,
        };
        *self.intent_mut(kind) = on;
        Some((kind, on))
    }

    pub fn intent(&self, kind: ActuatorKind) -> bool {
        match kind {
            ActuatorKind::Rotary => self.motor_intent,
            ActuatorKind::Tone => self.speaker_intent,
            ActuatorKind::Flow => self.water_intent,
        }
    }

    fn intent_mut(&mut self, kind: ActuatorKind) -> &mut bool {
        match kind {
            ActuatorKind::Rotary => &mut self.motor_intent,
            ActuatorKind::Tone => &mut self.speaker_intent,
            ActuatorKind::Flow => &mut self.water_intent,
        }
    }
}
