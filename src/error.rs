//! Unified error types for the irrigation controller.
//!
//! Every subsystem has its own small `Copy` enum so errors can be passed
//! through the control loop and the event sink without allocation.
//! Startup failures ([`HwInitError`]) are fatal and surface through `main`.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The digital input returned an error.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}


// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// The signal generator refused the requested frequency (Hz).
    FrequencyRejected(u32),
    /// The signal generator was already released at shutdown.
    SignalReleased,
    /// The external valve switch could not be launched at all.
    SwitchUnavailable,
    /// The external valve switch exited with a non-zero status.
    SwitchExit(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::FrequencyRejected(hz) => write!(f, "frequency {hz} Hz rejected"),
            Self::SignalReleased => write!(f, "signal generator already released"),
            Self::SwitchUnavailable => write!(f, "valve switch could not be started"),
            Self::SwitchExit(status) => write!(f, "valve switch exited with status {status}"),
        }
    }
}


// ---------------------------------------------------------------------------
// Coordinator link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Connection, timeout, or transport-level failure.
    Unreachable,
    /// The coordinator answered with a non-success HTTP status.
    Rejected(u16),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "coordinator unreachable"),
            Self::Rejected(status) => write!(f, "coordinator rejected request (HTTP {status})"),
        }
    }
}


// ---------------------------------------------------------------------------
// Hardware initialisation errors
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}
