//! Valve switch adapters.
//!
//! Implements [`SwitchPort`] for the water supply:
//!
//! - **`target_os = "espidf"`**: [`RelaySwitch`] drives the valve relay GPIO.
//! - **all other targets**: [`ScriptSwitch`] runs `<program> <script> on|off`
//!   and reports the child's exit status, so the bench rig can switch a
//!   real pump through whatever the script does.

use log::debug;

use crate::app::ports::SwitchPort;
use crate::error::ActuatorError;

// ───────────────────────────────────────────────────────────────
// Host: external script
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct ScriptSwitch {
    program: String,
    script: String,
}

#[cfg(not(target_os = "espidf"))]
impl ScriptSwitch {
    /// Run `script` through `bash`.
    pub fn new(script: impl Into<String>) -> Self {
        Self::with_program("bash", script)
    }

    pub fn with_program(program: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

#[cfg(not(target_os = "espidf"))]
impl SwitchPort for ScriptSwitch {
    fn run(&mut self, argument: &str) -> Result<i32, ActuatorError> {
        let status = std::process::Command::new(&self.program)
            .arg(&self.script)
            .arg(argument)
            .stdin(std::process::Stdio::null())
            .status()
            .map_err(|e| {
                debug!("valve script '{}' failed to start: {}", self.script, e);
                ActuatorError::SwitchUnavailable
            })?;
        // Killed by a signal: no exit code.
        Ok(status.code().unwrap_or(-1))
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF: relay GPIO
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct RelaySwitch {
    gpio: i32,
}

#[cfg(target_os = "espidf")]
impl RelaySwitch {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

#[cfg(target_os = "espidf")]
impl SwitchPort for RelaySwitch {
    fn run(&mut self, argument: &str) -> Result<i32, ActuatorError> {
        let energise = match argument {
            "on" => true,
            "off" => false,
            _ => return Ok(2),
        };
        match crate::drivers::hw_init::gpio_write(self.gpio, energise) {
            Ok(()) => Ok(0),
            Err(code) => {
                debug!("relay GPIO{} write failed: {}", self.gpio, code);
                Ok(1)
            }
        }
    }
}
