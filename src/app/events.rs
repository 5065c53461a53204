//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, record in a test, etc.

use crate::app::commands::Command;
use crate::drivers::ActuatorKind;
use crate::error::{ActuatorError, LinkError, SensorError};

/// Which coordinator request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOp {
    Report,
    Poll,
}

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop is about to run its first tick.
    Started,

    /// Soil probe sampled on a report tick.
    SoilRead { dry: bool },

    /// The coordinator acknowledged a reading.
    ReadingReported { dry: bool },

    /// The soil probe could not be read; water intent kept as is.
    SensorFault(SensorError),

    /// A coordinator request failed; the tick carries on.
    LinkFault { op: LinkOp, error: LinkError },

    /// A command was decoded from the mailbox (including `Unknown`).
    CommandReceived(Command),

    /// A command wrote an intent flag.
    IntentSet { actuator: ActuatorKind, on: bool },

    /// An actuator failed this tick; the remaining actuators still ran.
    ActuatorFault {
        actuator: ActuatorKind,
        error: ActuatorError,
    },

    /// End-of-tick intent snapshot.
    Status(StatusData),

    /// Outputs released, loop exiting.
    ShuttingDown,
}

/// A point-in-time intent snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusData {
    pub tick: u64,
    pub motor: bool,
    pub speaker: bool,
    pub water: bool,
}
