//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (soil probe, PWM channels, valve switch, coordinator
//! link, event sinks, config storage) implement these traits.  The
//! [`Controller`](super::service::Controller) and the actuator drivers
//! consume them via generics, so the domain core never touches hardware
//! directly.

use crate::app::commands::Command;
use crate::app::events::AppEvent;
use crate::config::DeviceConfig;
use crate::error::{ActuatorError, LinkError, SensorError};
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample the soil probe.
pub trait SensorPort {
    /// One pin read, no retry.  `moisture_raw == true` means dry.
    fn read_moisture(&mut self) -> Result<SensorReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Signal generator port (driven adapter: domain → PWM hardware)
// ───────────────────────────────────────────────────────────────

/// A PWM signal generator driving one actuator.
pub trait SignalPort {
    /// Set the duty cycle in percent (0.0 – 100.0).
    fn set_duty(&mut self, percent: f32) -> Result<(), ActuatorError>;

    /// Retune the carrier frequency.
    fn set_frequency(&mut self, hz: u32) -> Result<(), ActuatorError>;

    /// Stop the generator and hand the output back.  Idempotent; every
    /// later write fails with [`ActuatorError::SignalReleased`].
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Valve switch port (driven adapter: domain → external action)
// ───────────────────────────────────────────────────────────────

/// Opaque external on/off action for the water supply.
pub trait SwitchPort {
    /// Run the action with `"on"` or `"off"` and return its exit status.
    /// `Err` only when the action could not be started at all.
    fn run(&mut self, argument: &str) -> Result<i32, ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Coordinator link port (driven adapter: domain ↔ network)
// ───────────────────────────────────────────────────────────────

/// Request/response boundary to the coordinator.  Stateless: no retry,
/// no backoff — the next tick is the retry.
pub trait RemoteLink {
    /// Publish a soil reading.  Succeeds only on an explicit acknowledgement.
    fn report_reading(&mut self, reading: &SensorReading) -> Result<(), LinkError>;

    /// Fetch the latest operator command.
    fn poll_command(&mut self) -> Result<Command, LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log, test recorder, …).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ config source)
// ───────────────────────────────────────────────────────────────

/// Loads device configuration.
///
/// Implementations MUST run [`DeviceConfig::validate`] before returning a
/// config; invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<DeviceConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found (first boot, file missing).
    NotFound,
    /// Stored config could not be deserialised.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
