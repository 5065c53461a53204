//! Water flow driver.
//!
//! The valve supply is switched by an external on/off action (a shell
//! script on the bench rig, a relay on the board).  Every tick the driver
//! re-issues the action for the current intent and checks the exit status;
//! it never tracks whether the valve really changed state, and relies on
//! the action being idempotent.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::SwitchPort;
use crate::drivers::{Actuator, ActuatorKind};
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    On,
    Off,
}

impl FlowState {
    pub fn from_intent(intent: bool) -> Self {
        if intent { Self::On } else { Self::Off }
    }

    /// Argument handed to the switch action.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

pub struct FlowDriver<S> {
    switch: S,
    last_commanded: Option<FlowState>,
}

impl<S: SwitchPort> FlowDriver<S> {
    pub fn new(switch: S) -> Self {
        Self {
            switch,
            last_commanded: None,
        }
    }

    /// Last state the switch was asked for, regardless of its exit status.
    pub fn last_commanded(&self) -> Option<FlowState> {
        self.last_commanded
    }

    pub fn switch(&self) -> &S {
        &self.switch
    }

    fn command(&mut self, state: FlowState) -> Result<(), ActuatorError> {
        self.last_commanded = Some(state);
        let status = self.switch.run(state.as_arg())?;
        if status != 0 {
            return Err(ActuatorError::SwitchExit(status));
        }
        debug!("Valve switch '{}' ok", state.as_arg());
        Ok(())
    }
}

impl<S: SwitchPort> Actuator for FlowDriver<S> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Flow
    }

    fn apply(&mut self, intent: bool, _delay: &mut impl DelayNs) -> Result<(), ActuatorError> {
        self.command(FlowState::from_intent(intent))
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.command(FlowState::Off) {
            warn!("Valve: shutdown 'off' failed: {}", e);
        }
    }
}
